//! Shared handler state

use crate::config::ServerConfig;
use std::path::PathBuf;
use std::sync::Arc;
use taskboard_kanban::auth::{MemorySessionStore, SessionStore};
use taskboard_kanban::{KanbanContext, KanbanOperationProcessor};

/// Everything a handler needs, cloned per request
#[derive(Clone)]
pub struct AppState {
    /// Context with no actor; handlers derive a per-user copy
    pub kanban: KanbanContext,
    pub sessions: Arc<dyn SessionStore>,
    pub processor: KanbanOperationProcessor,
    pub upload_dir: PathBuf,
    pub upload_limit_bytes: usize,
}

impl AppState {
    pub fn new(kanban: KanbanContext, sessions: Arc<dyn SessionStore>) -> Self {
        let defaults = ServerConfig::default();
        Self {
            kanban,
            sessions,
            processor: KanbanOperationProcessor::new(),
            upload_dir: defaults.upload_dir,
            upload_limit_bytes: defaults.upload_limit_bytes,
        }
    }

    pub fn with_uploads(mut self, dir: impl Into<PathBuf>, limit_bytes: usize) -> Self {
        self.upload_dir = dir.into();
        self.upload_limit_bytes = limit_bytes;
        self
    }

    /// Open the database and build state from configuration
    pub async fn from_config(config: &ServerConfig) -> taskboard_kanban::Result<Self> {
        let kanban =
            KanbanContext::open_with_timeout(&config.database_path, config.busy_timeout()).await?;
        let sessions = Arc::new(MemorySessionStore::new(config.session_ttl()));
        Ok(Self::new(kanban, sessions).with_uploads(&config.upload_dir, config.upload_limit_bytes))
    }
}
