//! AddTask command

use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::{required, BoardError, Result};
use crate::ordering::positions::append_position;
use crate::processor::logged;
use crate::store::{Collection, StoreTx};
use crate::types::{ListId, Task, TaskId, TaskStatus, UserId};
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Append a task to a list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTask {
    pub list_id: ListId,
    /// Trimmed; must not be empty
    pub title: String,
    pub description: Option<String>,
}

operation!(AddTask, verb = "add", noun = "task", description = "Append a task to a list");

impl AddTask {
    pub fn new(list_id: impl Into<ListId>, title: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Insert a task at the end of its list. New tasks always start as `todo`.
/// Callers authorize first.
pub(crate) fn insert_task(
    tx: &StoreTx<'_>,
    list_id: &ListId,
    title: &str,
    description: &str,
    created_by: &UserId,
) -> Result<Task> {
    let task = Task {
        id: TaskId::new(),
        list_id: list_id.clone(),
        title: title.to_string(),
        description: description.to_string(),
        status: TaskStatus::default(),
        position: append_position(tx, Collection::Tasks, list_id.as_str())?,
    };
    let now = Utc::now();
    tx.execute(
        "INSERT INTO tasks (id, list_id, title, description, status, position, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            task.id,
            task.list_id,
            task.title,
            task.description,
            task.status,
            task.position,
            created_by,
            now
        ],
    )?;
    Ok(task)
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for AddTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let title = required(&self.title, "title")?;
            let description = self.description.clone().unwrap_or_default();
            let list_id = self.list_id.clone();
            let access = ctx.access();

            let task = ctx
                .store()
                .write(move |tx| {
                    if !tx.parent_exists(Collection::Tasks, list_id.as_str())? {
                        return Err(BoardError::not_found("list", list_id.as_str()));
                    }
                    access.ensure(tx, &user, &ScopeTarget::List(list_id.clone()))?;
                    insert_task(tx, &list_id, &title, &description, &user)
                })
                .await?;

            Ok(serde_json::to_value(&task)?)
        }
        .await;

        logged(self, start, result)
    }
}
