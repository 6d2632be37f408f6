//! AssignTask command

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

/// Assign a workspace member to a task
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssignTask {
    pub id: TaskId,
    pub assignee: UserId,
}

operation!(AssignTask, verb = "assign", noun = "task", description = "Assign a workspace member to a task");

impl AssignTask {
    pub fn new(id: impl Into<TaskId>, assignee: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            assignee: assignee.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for AssignTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let id = self.id.clone();
            let assignee = self.assignee.clone();
            let access = ctx.access();

            let assignees = ctx
                .store()
                .write(move |tx| {
                    let task = load_task(tx, &id)?;
                    let scope = ScopeTarget::List(task.list_id);
                    access.ensure(tx, &user, &scope)?;
                    if !access.is_authorized(tx, &assignee, &scope)? {
                        return Err(BoardError::validation(format!(
                            "user {assignee} is not a member of this workspace"
                        )));
                    }

                    tx.execute(
                        "INSERT OR IGNORE INTO task_assignees (task_id, user_id) VALUES (?1, ?2)",
                        params![id, assignee],
                    )?;
                    load_assignees(tx, &id)
                })
                .await?;

            Ok(json!({
                "assigned": true,
                "task_id": self.id,
                "assignee": self.assignee,
                "all_assignees": assignees,
            }))
        }
        .await;

        logged(self, start, result)
    }
}
