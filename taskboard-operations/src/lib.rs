//! # Taskboard Operations
//!
//! Every board mutation and query is a struct whose fields are its parameters.
//! The struct implements [`Operation`] for its metadata and [`Execute`] for its
//! behavior against a context.
//!
//! ## Example
//!
//! ```ignore
//! use taskboard_operations::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct AddTask {
//!     /// The task title
//!     pub title: String,
//! }
//!
//! operation!(AddTask, verb = "add", noun = "task", description = "Create a new task");
//!
//! #[async_trait]
//! impl Execute<KanbanContext, BoardError> for AddTask {
//!     async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
//!         // implementation returns ExecutionResult::Logged or Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
