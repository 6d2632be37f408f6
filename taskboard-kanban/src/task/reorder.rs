//! ReorderTasks command

use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::logged;
use crate::store::Collection;
use crate::types::{ListId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Put every task of a list in the given order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderTasks {
    pub list_id: ListId,
    pub task_ids: Vec<TaskId>,
}

operation!(ReorderTasks, verb = "reorder", noun = "tasks", description = "Set the order of a list's tasks");

impl ReorderTasks {
    pub fn new(list_id: impl Into<ListId>, task_ids: Vec<TaskId>) -> Self {
        Self {
            list_id: list_id.into(),
            task_ids,
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for ReorderTasks {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?;
            let ids = self.task_ids.iter().map(|id| id.to_string()).collect();
            ctx.orchestrator()
                .reorder(user, Collection::Tasks, self.list_id.as_str(), ids)
                .await?;
            Ok(json!({ "ok": true }))
        }
        .await;

        logged(self, start, result)
    }
}
