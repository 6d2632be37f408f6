//! Core types for the kanban engine

mod board;
mod ids;
mod task;
mod user;

// Re-export all types
pub use board::{
    Board, BoardInclude, BoardView, List, ListView, MemberRole, TaskView, Workspace,
    DEFAULT_LIST_NAMES,
};
pub use ids::{BoardId, CommentId, ListId, TaskId, UserId, WorkspaceId};
pub use task::{Comment, Task, TaskStatus, TaskUpdate};
pub use user::User;
