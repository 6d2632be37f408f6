//! AddList command

use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::{required, BoardError, Result};
use crate::ordering::positions::append_position;
use crate::processor::logged;
use crate::store::{Collection, StoreTx};
use crate::types::{BoardId, List, ListId};
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Append a list to a board
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddList {
    pub board_id: BoardId,
    pub name: String,
}

operation!(AddList, verb = "add", noun = "list", description = "Append a list to a board");

impl AddList {
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            name: name.into(),
        }
    }
}

/// Insert a list at the end of its board. Callers authorize first.
pub(crate) fn insert_list(tx: &StoreTx<'_>, board_id: &BoardId, name: &str) -> Result<List> {
    let list = List {
        id: ListId::new(),
        board_id: board_id.clone(),
        name: name.to_string(),
        position: append_position(tx, Collection::Lists, board_id.as_str())?,
    };
    tx.execute(
        "INSERT INTO lists (id, board_id, name, position, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![list.id, list.board_id, list.name, list.position, Utc::now()],
    )?;
    Ok(list)
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for AddList {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let name = required(&self.name, "name")?;
            let board_id = self.board_id.clone();
            let access = ctx.access();

            let list = ctx
                .store()
                .write(move |tx| {
                    if !tx.parent_exists(Collection::Lists, board_id.as_str())? {
                        return Err(BoardError::not_found("board", board_id.as_str()));
                    }
                    access.ensure(tx, &user, &ScopeTarget::Board(board_id.clone()))?;
                    insert_list(tx, &board_id, &name)
                })
                .await?;

            Ok(serde_json::to_value(&list)?)
        }
        .await;

        logged(self, start, result)
    }
}
