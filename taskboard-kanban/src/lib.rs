//! Kanban board engine backed by SQLite
//!
//! Users belong to workspaces, workspaces own boards, boards hold ordered lists
//! and lists hold ordered tasks. Every list and task carries a dense position:
//! the members of one parent always sit at `0..n-1` with no gaps or duplicates,
//! no matter how many moves run concurrently.
//!
//! ## Overview
//!
//! - **Command per struct** - each mutation or query is a serde struct that
//!   implements [`Execute`]
//! - **One transaction per command** - a command either applies completely or
//!   not at all
//! - **Position engine** - [`ordering`] computes the shifts a move needs and
//!   applies them under an immediate write lock
//! - **Workspace access** - every command checks the acting user against
//!   [`access::AccessScope`] before it reads or writes
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use taskboard_kanban::{task::{AddTask, MoveTask}, Execute, KanbanContext};
//! use taskboard_kanban::types::{ListId, UserId};
//!
//! # async fn example(user: UserId, todo: ListId, done: ListId) -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = KanbanContext::open("/var/lib/taskboard/board.db").await?.for_user(user);
//!
//! let task = AddTask::new(todo, "Ship it").execute(&ctx).await.into_result()?;
//! let task_id = task["id"].as_str().unwrap_or_default().to_string();
//!
//! MoveTask::new(task_id, done, 0).execute(&ctx).await.into_result()?;
//! # Ok(())
//! # }
//! ```
//!
//! Run commands through [`KanbanOperationProcessor`] to record each mutation in
//! the acting user's activity trail.

pub mod access;
pub mod auth;
mod context;
mod error;
pub mod ordering;
mod processor;
pub mod store;
pub mod types;

// Command modules
pub mod activity;
pub mod board;
pub mod comment;
pub mod list;
pub mod task;
pub mod user;

#[cfg(test)]
mod test_support;

// Re-export Execute trait and types from operations crate
pub use taskboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use context::{KanbanContext, DEFAULT_ACTIVITY_LIMIT};
pub use error::{BoardError, Result};
pub use processor::KanbanOperationProcessor;
