//! Task types: Task, TaskStatus, TaskUpdate, Comment

use super::ids::{CommentId, ListId, TaskId, UserId};
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a task. Independent of which list holds it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown status {s}").into()))
    }
}

/// A task card inside a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub list_id: ListId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub position: i64,
}

/// The closed set of field combinations a task update may touch.
///
/// Each variant maps to one fixed, parameterised UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    Title(String),
    Description(String),
    TitleAndDescription { title: String, description: String },
}

impl TaskUpdate {
    /// Build an update from optional fields. Titles are trimmed and must not
    /// end up empty; supplying neither field is rejected.
    pub fn from_fields(title: Option<&str>, description: Option<&str>) -> Result<Self> {
        let title = match title {
            Some(t) => {
                let trimmed = t.trim();
                if trimmed.is_empty() {
                    return Err(BoardError::validation("title must not be empty"));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        match (title, description) {
            (Some(title), Some(description)) => Ok(Self::TitleAndDescription {
                title,
                description: description.to_string(),
            }),
            (Some(title), None) => Ok(Self::Title(title)),
            (None, Some(description)) => Ok(Self::Description(description.to_string())),
            (None, None) => Err(BoardError::validation("nothing to update")),
        }
    }
}

/// A comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
