//! GetTask command

use super::{load_assignees, load_task};
use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::unlogged;
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Read one task with its assignees
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetTask {
    pub id: TaskId,
}

operation!(GetTask, verb = "get", noun = "task", description = "Read a task");

impl GetTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for GetTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let result = async {
            let user = ctx.actor()?.clone();
            let id = self.id.clone();
            let access = ctx.access();

            let (task, assignees) = ctx
                .store()
                .read(move |conn| {
                    let task = load_task(conn, &id)?;
                    access.ensure(conn, &user, &ScopeTarget::List(task.list_id.clone()))?;
                    let assignees = load_assignees(conn, &id)?;
                    Ok((task, assignees))
                })
                .await?;

            let mut value = serde_json::to_value(&task)?;
            value["assignees"] = json!(assignees);
            Ok(value)
        }
        .await;

        unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, seed_tasks};

    #[tokio::test]
    async fn test_get_task() {
        let fx = fixture().await;
        let tasks = seed_tasks(&fx.ctx, &fx.lists[0], 2).await;

        let result = GetTask::new(tasks[1].clone()).execute(&fx.ctx).await;
        assert!(!result.should_log());
        let value = result.into_result().unwrap();
        assert_eq!(value["title"], "task 1");
        assert_eq!(value["position"], 1);
        assert_eq!(value["assignees"], json!([]));
    }

    #[tokio::test]
    async fn test_get_task_errors() {
        let fx = fixture().await;
        let tasks = seed_tasks(&fx.ctx, &fx.lists[0], 1).await;

        let missing = GetTask::new(TaskId::new()).execute(&fx.ctx).await.into_result();
        assert!(matches!(missing, Err(BoardError::NotFound { .. })));

        let stranger = GetTask::new(tasks[0].clone())
            .execute(&fx.as_bob())
            .await
            .into_result();
        assert!(matches!(stranger, Err(BoardError::Forbidden { .. })));
    }
}
