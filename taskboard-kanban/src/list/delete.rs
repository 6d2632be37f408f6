//! DeleteList command

use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::ordering::positions::remove_member;
use crate::processor::logged;
use crate::store::Collection;
use crate::types::ListId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Delete a list and its tasks, compacting the board's list order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteList {
    pub id: ListId,
}

operation!(DeleteList, verb = "delete", noun = "list", description = "Delete a list and its tasks");

impl DeleteList {
    pub fn new(id: impl Into<ListId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for DeleteList {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let id = self.id.clone();
            let access = ctx.access();

            let removed = ctx
                .store()
                .write(move |tx| {
                    let member = tx
                        .get_member(Collection::Lists, id.as_str())?
                        .ok_or_else(|| BoardError::not_found("list", id.as_str()))?;
                    access.ensure(tx, &user, &Collection::Lists.parent_scope(&member.parent_id))?;
                    remove_member(tx, Collection::Lists, id.as_str())
                })
                .await?;

            Ok(json!({ "deleted": true, "id": removed.id, "board_id": removed.parent_id }))
        }
        .await;

        logged(self, start, result)
    }
}
