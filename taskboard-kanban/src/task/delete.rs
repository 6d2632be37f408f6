//! DeleteTask command

use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::ordering::positions::remove_member;
use crate::processor::logged;
use crate::store::Collection;
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Delete a task, compacting its list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteTask {
    pub id: TaskId,
}

operation!(DeleteTask, verb = "delete", noun = "task", description = "Delete a task");

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for DeleteTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let id = self.id.clone();
            let access = ctx.access();

            let removed = ctx
                .store()
                .write(move |tx| {
                    let member = tx
                        .get_member(Collection::Tasks, id.as_str())?
                        .ok_or_else(|| BoardError::not_found("task", id.as_str()))?;
                    access.ensure(tx, &user, &Collection::Tasks.parent_scope(&member.parent_id))?;
                    remove_member(tx, Collection::Tasks, id.as_str())
                })
                .await?;

            Ok(json!({ "deleted": true, "id": removed.id, "list_id": removed.parent_id }))
        }
        .await;

        logged(self, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, member_order, seed_tasks};

    #[tokio::test]
    async fn test_delete_compacts_later_tasks() {
        let fx = fixture().await;
        let tasks = seed_tasks(&fx.ctx, &fx.lists[0], 4).await;

        let result = DeleteTask::new(tasks[1].clone())
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["list_id"], fx.lists[0].as_str());

        assert_eq!(
            member_order(&fx.ctx, Collection::Tasks, fx.lists[0].as_str()).await,
            vec![tasks[0].to_string(), tasks[2].to_string(), tasks[3].to_string()]
        );
        assert_eq!(
            crate::test_support::positions(&fx.ctx, Collection::Tasks, fx.lists[0].as_str()).await,
            vec![0, 1, 2]
        );
    }

    #[tokio::test]
    async fn test_stranger_cannot_delete() {
        let fx = fixture().await;
        let tasks = seed_tasks(&fx.ctx, &fx.lists[0], 1).await;
        let result = DeleteTask::new(tasks[0].clone())
            .execute(&fx.as_bob())
            .await
            .into_result();
        assert!(matches!(result, Err(BoardError::Forbidden { .. })));
    }
}
