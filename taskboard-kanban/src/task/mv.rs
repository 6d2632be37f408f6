//! MoveTask command

use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::ordering::MoveRequest;
use crate::processor::logged;
use crate::store::Collection;
use crate::types::{ListId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Move a task to an index in the same or another list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoveTask {
    pub id: TaskId,
    /// Destination list
    pub list_id: ListId,
    /// Desired index; clamped to the destination's bounds
    pub index: i64,
}

operation!(MoveTask, verb = "move", noun = "task", description = "Move a task within or across lists");

impl MoveTask {
    pub fn new(id: impl Into<TaskId>, list_id: impl Into<ListId>, index: i64) -> Self {
        Self {
            id: id.into(),
            list_id: list_id.into(),
            index,
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for MoveTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?;
            let outcome = ctx
                .orchestrator()
                .move_member(
                    user,
                    Collection::Tasks,
                    MoveRequest {
                        member_id: self.id.to_string(),
                        target_parent_id: self.list_id.to_string(),
                        target_index: self.index,
                    },
                )
                .await?;
            Ok(serde_json::to_value(&outcome)?)
        }
        .await;

        logged(self, start, result)
    }
}
