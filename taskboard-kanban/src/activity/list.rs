//! ListActivity command

use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// The acting user's recent activity, newest first
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

operation!(ListActivity, verb = "list", noun = "activity", description = "List recent activity");

impl ListActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for ListActivity {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let result = async {
            let actor = ctx.actor()?;
            let entries = ctx.read_activity(actor, self.limit).await?;
            Ok(json!({
                "count": entries.len(),
                "entries": entries,
            }))
        }
        .await;

        unlogged(result)
    }
}
