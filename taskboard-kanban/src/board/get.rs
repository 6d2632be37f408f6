//! GetBoard command

use crate::access::{AccessScope, ScopeTarget};
use crate::context::KanbanContext;
use crate::error::{BoardError, Result};
use crate::processor::unlogged;
use crate::types::{BoardId, BoardInclude, BoardView, ListId, ListView, TaskId, TaskView, UserId};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Read a board with its lists and tasks in position order
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GetBoard {
    /// Board to read; the caller's earliest board when absent
    pub id: Option<BoardId>,
    /// `lists,tasks` (default), `lists`, or anything else for the header only
    #[serde(default)]
    pub include: Option<String>,
}

operation!(GetBoard, verb = "get", noun = "board", description = "Read a board with its lists and tasks");

impl GetBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: Some(id.into()),
            include: None,
        }
    }

    /// The caller's earliest board
    pub fn default_board() -> Self {
        Self::default()
    }

    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for GetBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let result = async {
            let user = ctx.actor()?.clone();
            let include = BoardInclude::parse(self.include.as_deref().unwrap_or(""));
            let id = self.id.clone();
            let access = ctx.access();

            let view = ctx
                .store()
                .read(move |conn| {
                    let board_id = match id {
                        Some(id) => id,
                        None => first_board_of(conn, &user)?
                            .ok_or_else(|| BoardError::not_found("board", "default"))?,
                    };
                    load_board(conn, access.as_ref(), &user, &board_id, include)
                })
                .await?;

            Ok(serde_json::to_value(&view)?)
        }
        .await;

        unlogged(result)
    }
}

fn first_board_of(conn: &Connection, user: &UserId) -> Result<Option<BoardId>> {
    let id = conn
        .query_row(
            "SELECT b.id FROM boards b
             JOIN workspace_members m ON m.workspace_id = b.workspace_id
             WHERE m.user_id = ?1
             ORDER BY b.created_at, b.id LIMIT 1",
            [user],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Load the nested board view after checking the caller's access
pub(crate) fn load_board(
    conn: &Connection,
    access: &dyn AccessScope,
    user: &UserId,
    board_id: &BoardId,
    include: BoardInclude,
) -> Result<BoardView> {
    let name: String = conn
        .query_row("SELECT name FROM boards WHERE id = ?1", [board_id], |row| row.get(0))
        .optional()?
        .ok_or_else(|| BoardError::not_found("board", board_id.as_str()))?;
    access.ensure(conn, user, &ScopeTarget::Board(board_id.clone()))?;

    let mut view = BoardView {
        id: board_id.clone(),
        name,
        lists: Vec::new(),
    };
    if !include.wants_lists() {
        return Ok(view);
    }

    let mut stmt = conn.prepare_cached(
        "SELECT id, name, position FROM lists WHERE board_id = ?1 ORDER BY position, id",
    )?;
    view.lists = stmt
        .query_map([board_id], |row| {
            Ok(ListView {
                id: row.get(0)?,
                name: row.get(1)?,
                position: row.get(2)?,
                tasks: Vec::new(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if !include.wants_tasks() {
        return Ok(view);
    }

    let mut assignees: HashMap<TaskId, Vec<UserId>> = HashMap::new();
    let mut stmt = conn.prepare_cached(
        "SELECT a.task_id, a.user_id FROM task_assignees a
         JOIN tasks t ON t.id = a.task_id
         JOIN lists l ON l.id = t.list_id
         WHERE l.board_id = ?1
         ORDER BY a.user_id",
    )?;
    let rows = stmt.query_map([board_id], |row| {
        Ok((row.get::<_, TaskId>(0)?, row.get::<_, UserId>(1)?))
    })?;
    for row in rows {
        let (task, user) = row?;
        assignees.entry(task).or_default().push(user);
    }

    let mut by_list: HashMap<ListId, Vec<TaskView>> = HashMap::new();
    let mut stmt = conn.prepare_cached(
        "SELECT t.id, t.list_id, t.title, t.description, t.status, t.position,
                (SELECT COUNT(*) FROM comments c WHERE c.task_id = t.id)
         FROM tasks t JOIN lists l ON l.id = t.list_id
         WHERE l.board_id = ?1
         ORDER BY t.position, t.id",
    )?;
    let rows = stmt.query_map([board_id], |row| {
        Ok((
            row.get::<_, ListId>(1)?,
            TaskView {
                id: row.get(0)?,
                title: row.get(2)?,
                description: row.get(3)?,
                status: row.get(4)?,
                position: row.get(5)?,
                assignees: Vec::new(),
                comment_count: row.get(6)?,
            },
        ))
    })?;
    for row in rows {
        let (list_id, mut task) = row?;
        task.assignees = assignees.remove(&task.id).unwrap_or_default();
        by_list.entry(list_id).or_default().push(task);
    }

    for list in &mut view.lists {
        list.tasks = by_list.remove(&list.id).unwrap_or_default();
    }
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, seed_tasks};
    use rusqlite::params;

    #[tokio::test]
    async fn test_get_board_nests_lists_and_tasks_in_order() {
        let fx = fixture().await;
        let tasks = seed_tasks(&fx.ctx, &fx.lists[1], 2).await;
        let (task, alice) = (tasks[1].clone(), fx.alice.clone());
        fx.ctx
            .store()
            .write(move |tx| {
                tx.execute(
                    "INSERT INTO task_assignees (task_id, user_id) VALUES (?1, ?2)",
                    params![task, alice],
                )?;
                tx.execute(
                    "INSERT INTO comments (id, task_id, author_id, body, created_at)
                     VALUES ('c1', ?1, ?2, 'hi', '2024-01-01')",
                    params![task, alice],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let value = GetBoard::new(fx.board.clone())
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();
        let view: BoardView = serde_json::from_value(value).unwrap();

        assert_eq!(view.lists.len(), 3);
        assert_eq!(view.lists[0].name, "To Do");
        assert!(view.lists[0].tasks.is_empty());
        let doing = &view.lists[1].tasks;
        assert_eq!(doing.iter().map(|t| t.id.clone()).collect::<Vec<_>>(), tasks);
        assert_eq!(doing[1].assignees, vec![fx.alice.clone()]);
        assert_eq!(doing[1].comment_count, 1);
        assert_eq!(doing[0].comment_count, 0);
    }

    #[tokio::test]
    async fn test_include_selector_trims_payload() {
        let fx = fixture().await;
        seed_tasks(&fx.ctx, &fx.lists[0], 1).await;

        let lists_only = GetBoard::new(fx.board.clone())
            .with_include("lists")
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(lists_only["lists"].as_array().unwrap().len(), 3);
        assert_eq!(lists_only["lists"][0]["tasks"].as_array().unwrap().len(), 0);

        let header = GetBoard::new(fx.board.clone())
            .with_include("none")
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(header["lists"].as_array().unwrap().len(), 0);
        assert_eq!(header["name"], "Board");
    }

    #[tokio::test]
    async fn test_default_board_and_access() {
        let fx = fixture().await;
        let value = GetBoard::default_board()
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["id"], fx.board.as_str());

        let forbidden = GetBoard::new(fx.board.clone())
            .execute(&fx.as_bob())
            .await
            .into_result();
        assert!(matches!(forbidden, Err(BoardError::Forbidden { .. })));

        let none = GetBoard::default_board().execute(&fx.as_bob()).await.into_result();
        assert!(matches!(none, Err(BoardError::NotFound { .. })));
    }
}
