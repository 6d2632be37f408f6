//! UnassignTask command

use super::{load_assignees, load_task};
use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::logged;
use crate::types::{TaskId, UserId};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Remove an assignee from a task
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnassignTask {
    pub id: TaskId,
    pub assignee: UserId,
}

operation!(UnassignTask, verb = "unassign", noun = "task", description = "Remove an assignee from a task");

impl UnassignTask {
    pub fn new(id: impl Into<TaskId>, assignee: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            assignee: assignee.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for UnassignTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let id = self.id.clone();
            let assignee = self.assignee.clone();
            let access = ctx.access();

            let (removed, assignees) = ctx
                .store()
                .write(move |tx| {
                    let task = load_task(tx, &id)?;
                    access.ensure(tx, &user, &ScopeTarget::List(task.list_id))?;
                    let removed = tx.execute(
                        "DELETE FROM task_assignees WHERE task_id = ?1 AND user_id = ?2",
                        params![id, assignee],
                    )?;
                    Ok((removed > 0, load_assignees(tx, &id)?))
                })
                .await?;

            Ok(json!({
                "unassigned": removed,
                "task_id": self.id,
                "assignee": self.assignee,
                "all_assignees": assignees,
            }))
        }
        .await;

        logged(self, start, result)
    }
}
