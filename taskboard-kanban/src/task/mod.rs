//! Task commands

mod add;
mod assign;
mod delete;
mod get;
mod mv;
mod reorder;
mod unassign;
mod update;

pub use add::AddTask;
pub use assign::AssignTask;
pub use delete::DeleteTask;
pub use get::GetTask;
pub use mv::MoveTask;
pub use reorder::ReorderTasks;
pub use unassign::UnassignTask;
pub use update::UpdateTask;

pub(crate) use add::insert_task;

use crate::error::{BoardError, Result};
use crate::types::{Task, TaskId, UserId};
use rusqlite::{Connection, OptionalExtension};

/// Read one task row
pub(crate) fn load_task(conn: &Connection, id: &TaskId) -> Result<Task> {
    conn.query_row(
        "SELECT id, list_id, title, description, status, position FROM tasks WHERE id = ?1",
        [id],
        |row| {
            Ok(Task {
                id: row.get(0)?,
                list_id: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                status: row.get(4)?,
                position: row.get(5)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| BoardError::not_found("task", id.as_str()))
}

/// Users assigned to a task
pub(crate) fn load_assignees(conn: &Connection, id: &TaskId) -> Result<Vec<UserId>> {
    let mut stmt = conn
        .prepare_cached("SELECT user_id FROM task_assignees WHERE task_id = ?1 ORDER BY user_id")?;
    let ids = stmt
        .query_map([id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<UserId>>>()?;
    Ok(ids)
}
