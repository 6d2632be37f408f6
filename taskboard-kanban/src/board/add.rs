//! AddBoard command

use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::{required, BoardError, Result};
use crate::processor::logged;
use crate::types::{Board, BoardId, UserId, WorkspaceId};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Create a board inside a workspace the caller belongs to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddBoard {
    pub workspace_id: WorkspaceId,
    pub name: String,
}

operation!(AddBoard, verb = "add", noun = "board", description = "Create a board in a workspace");

impl AddBoard {
    pub fn new(workspace_id: impl Into<WorkspaceId>, name: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            name: name.into(),
        }
    }
}

/// Insert a board row. Callers authorize first.
pub(crate) fn insert_board(
    conn: &rusqlite::Connection,
    workspace_id: &WorkspaceId,
    name: &str,
    owner_id: &UserId,
) -> Result<Board> {
    let board = Board {
        id: BoardId::new(),
        name: name.to_string(),
        workspace_id: workspace_id.clone(),
        owner_id: owner_id.clone(),
    };
    conn.execute(
        "INSERT INTO boards (id, workspace_id, name, owner_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![board.id, board.workspace_id, board.name, board.owner_id, Utc::now()],
    )?;
    Ok(board)
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for AddBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let name = required(&self.name, "name")?;
            let workspace_id = self.workspace_id.clone();
            let access = ctx.access();

            let board = ctx
                .store()
                .write(move |tx| {
                    let exists = tx
                        .query_row(
                            "SELECT 1 FROM workspaces WHERE id = ?1",
                            [&workspace_id],
                            |_| Ok(()),
                        )
                        .optional()?;
                    if exists.is_none() {
                        return Err(BoardError::not_found("workspace", workspace_id.as_str()));
                    }
                    access.ensure(tx, &user, &ScopeTarget::Workspace(workspace_id.clone()))?;
                    insert_board(tx, &workspace_id, &name, &user)
                })
                .await?;

            Ok(serde_json::to_value(&board)?)
        }
        .await;

        logged(self, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture;

    #[tokio::test]
    async fn test_add_board() {
        let fx = fixture().await;
        let result = AddBoard::new(fx.workspace.clone(), "  Roadmap ")
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Roadmap");
        assert_eq!(result["owner_id"], fx.alice.as_str());
    }

    #[tokio::test]
    async fn test_add_board_outside_workspace_is_forbidden() {
        let fx = fixture().await;
        let result = AddBoard::new(fx.workspace.clone(), "Mine")
            .execute(&fx.as_bob())
            .await
            .into_result();
        assert!(matches!(result, Err(BoardError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_add_board_validates() {
        let fx = fixture().await;
        let empty = AddBoard::new(fx.workspace.clone(), " ")
            .execute(&fx.ctx)
            .await
            .into_result();
        assert!(matches!(empty, Err(BoardError::Validation { .. })));

        let missing = AddBoard::new(WorkspaceId::new(), "X")
            .execute(&fx.ctx)
            .await
            .into_result();
        assert!(matches!(missing, Err(BoardError::NotFound { .. })));
    }
}
