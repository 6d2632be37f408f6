//! HTTP server for the taskboard kanban engine
//!
//! Thin axum layer: handlers resolve the session, deserialize a command from
//! the request and run it through [`KanbanOperationProcessor`] so every
//! mutation lands in the activity trail.
//!
//! [`KanbanOperationProcessor`]: taskboard_kanban::KanbanOperationProcessor

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
