//! AddComment command

use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::{required, BoardError};
use crate::processor::logged;
use crate::task::load_task;
use crate::types::{Comment, CommentId, TaskId};
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Add a comment to a task as the acting user
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddComment {
    pub task_id: TaskId,
    pub body: String,
}

operation!(AddComment, verb = "add", noun = "comment", description = "Add a comment to a task");

impl AddComment {
    pub fn new(task_id: impl Into<TaskId>, body: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            body: body.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for AddComment {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let body = required(&self.body, "body")?;
            let task_id = self.task_id.clone();
            let access = ctx.access();

            let comment = ctx
                .store()
                .write(move |tx| {
                    let task = load_task(tx, &task_id)?;
                    access.ensure(tx, &user, &ScopeTarget::List(task.list_id))?;

                    let comment = Comment {
                        id: CommentId::new(),
                        task_id,
                        author_id: user,
                        body,
                        created_at: Utc::now(),
                    };
                    tx.execute(
                        "INSERT INTO comments (id, task_id, author_id, body, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![
                            comment.id,
                            comment.task_id,
                            comment.author_id,
                            comment.body,
                            comment.created_at
                        ],
                    )?;
                    Ok(comment)
                })
                .await?;

            Ok(serde_json::to_value(&comment)?)
        }
        .await;

        logged(self, start, result)
    }
}
