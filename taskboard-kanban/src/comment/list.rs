//! ListComments command

use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::unlogged;
use crate::task::load_task;
use crate::types::{Comment, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List all comments on a task, oldest first
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListComments {
    pub task_id: TaskId,
}

operation!(ListComments, verb = "list", noun = "comments", description = "List all comments on a task");

impl ListComments {
    pub fn new(task_id: impl Into<TaskId>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for ListComments {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let result = async {
            let user = ctx.actor()?.clone();
            let task_id = self.task_id.clone();
            let access = ctx.access();

            let comments = ctx
                .store()
                .read(move |conn| {
                    let task = load_task(conn, &task_id)?;
                    access.ensure(conn, &user, &ScopeTarget::List(task.list_id))?;

                    let mut stmt = conn.prepare_cached(
                        "SELECT id, task_id, author_id, body, created_at FROM comments
                         WHERE task_id = ?1 ORDER BY created_at, id",
                    )?;
                    let comments = stmt
                        .query_map([&task_id], |row| {
                            Ok(Comment {
                                id: row.get(0)?,
                                task_id: row.get(1)?,
                                author_id: row.get(2)?,
                                body: row.get(3)?,
                                created_at: row.get(4)?,
                            })
                        })?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    Ok(comments)
                })
                .await?;

            Ok(json!({
                "count": comments.len(),
                "comments": comments,
            }))
        }
        .await;

        unlogged(result)
    }
}
