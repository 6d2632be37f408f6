//! UpdateTask command

use super::load_task;
use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::logged;
use crate::types::{TaskId, TaskUpdate};
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Change a task's title, description, or both
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateTask {
    pub id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
}

operation!(UpdateTask, verb = "update", noun = "task", description = "Edit a task's title or description");

impl UpdateTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for UpdateTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let update = TaskUpdate::from_fields(self.title.as_deref(), self.description.as_deref())?;
            let id = self.id.clone();
            let access = ctx.access();

            let task = ctx
                .store()
                .write(move |tx| {
                    let task = load_task(tx, &id)?;
                    access.ensure(tx, &user, &ScopeTarget::List(task.list_id.clone()))?;

                    let now = Utc::now();
                    match &update {
                        TaskUpdate::Title(title) => tx.execute(
                            "UPDATE tasks SET title = ?2, updated_at = ?3 WHERE id = ?1",
                            params![id, title, now],
                        )?,
                        TaskUpdate::Description(description) => tx.execute(
                            "UPDATE tasks SET description = ?2, updated_at = ?3 WHERE id = ?1",
                            params![id, description, now],
                        )?,
                        TaskUpdate::TitleAndDescription { title, description } => tx.execute(
                            "UPDATE tasks SET title = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
                            params![id, title, description, now],
                        )?,
                    };
                    load_task(tx, &id)
                })
                .await?;

            Ok(serde_json::to_value(&task)?)
        }
        .await;

        logged(self, start, result)
    }
}
