//! UpdateList command

use crate::access::ScopeTarget;
use crate::context::KanbanContext;
use crate::error::{required, BoardError};
use crate::processor::logged;
use crate::types::{List, ListId};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Rename a list. Position is not touched here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateList {
    pub id: ListId,
    pub name: String,
}

operation!(UpdateList, verb = "update", noun = "list", description = "Rename a list");

impl UpdateList {
    pub fn new(id: impl Into<ListId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for UpdateList {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?.clone();
            let name = required(&self.name, "name")?;
            let id = self.id.clone();
            let access = ctx.access();

            let list = ctx
                .store()
                .write(move |tx| {
                    let mut list = tx
                        .query_row(
                            "SELECT id, board_id, name, position FROM lists WHERE id = ?1",
                            [&id],
                            |row| {
                                Ok(List {
                                    id: row.get(0)?,
                                    board_id: row.get(1)?,
                                    name: row.get(2)?,
                                    position: row.get(3)?,
                                })
                            },
                        )
                        .optional()?
                        .ok_or_else(|| BoardError::not_found("list", id.as_str()))?;
                    access.ensure(tx, &user, &ScopeTarget::Board(list.board_id.clone()))?;

                    tx.execute(
                        "UPDATE lists SET name = ?2 WHERE id = ?1",
                        params![list.id, name],
                    )?;
                    list.name = name;
                    Ok(list)
                })
                .await?;

            Ok(serde_json::to_value(&list)?)
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
    async fn test_rename_list() {
        let fx = fixture().await;
        let result = UpdateList::new(fx.lists[1].clone(), " In Review ")
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["name"], "In Review");
        assert_eq!(result["position"], 1);
    }

    #[tokio::test]
    async fn test_rename_rejects_blank_and_strangers() {
        let fx = fixture().await;
        let blank = UpdateList::new(fx.lists[0].clone(), "")
            .execute(&fx.ctx)
            .await
            .into_result();
        assert!(matches!(blank, Err(BoardError::Validation { .. })));

        let stranger = UpdateList::new(fx.lists[0].clone(), "Mine")
            .execute(&fx.as_bob())
            .await
            .into_result();
        assert!(matches!(stranger, Err(BoardError::Forbidden { .. })));
    }
}
