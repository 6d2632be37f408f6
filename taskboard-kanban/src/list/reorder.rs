//! ReorderLists command

use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::logged;
use crate::store::Collection;
use crate::types::{BoardId, ListId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Put every list of a board in the given order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderLists {
    pub board_id: BoardId,
    pub list_ids: Vec<ListId>,
}

operation!(ReorderLists, verb = "reorder", noun = "lists", description = "Set the order of a board's lists");

impl ReorderLists {
    pub fn new(board_id: impl Into<BoardId>, list_ids: Vec<ListId>) -> Self {
        Self {
            board_id: board_id.into(),
            list_ids,
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for ReorderLists {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?;
            let ids = self.list_ids.iter().map(|id| id.to_string()).collect();
            ctx.orchestrator()
                .reorder(user, Collection::Lists, self.board_id.as_str(), ids)
                .await?;
            Ok(json!({ "ok": true }))
        }
        .await;

        logged(self, start, result)
    }
}
