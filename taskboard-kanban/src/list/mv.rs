//! MoveList command

use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::logged;
use crate::store::Collection;
use crate::types::ListId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Move one list to a new index within its board
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoveList {
    pub id: ListId,
    pub index: i64,
}

operation!(MoveList, verb = "move", noun = "list", description = "Move a list to a new index on its board");

impl MoveList {
    pub fn new(id: impl Into<ListId>, index: i64) -> Self {
        Self {
            id: id.into(),
            index,
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, BoardError> for MoveList {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let start = Instant::now();

        let result = async {
            let user = ctx.actor()?;
            let outcome = ctx
                .orchestrator()
                .move_within(user, Collection::Lists, self.id.as_str(), self.index)
                .await?;
            Ok(serde_json::to_value(&outcome)?)
        }
        .await;

        logged(self, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, member_order};

    #[tokio::test]
    async fn test_move_list_clamps_to_last_slot() {
        let fx = fixture().await;
        let result = MoveList::new(fx.lists[0].clone(), 42)
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["final_index"], 2);
        assert_eq!(result["final_parent_id"], fx.board.as_str());
        assert_eq!(
            member_order(&fx.ctx, Collection::Lists, fx.board.as_str()).await,
            vec![
                fx.lists[1].to_string(),
                fx.lists[2].to_string(),
                fx.lists[0].to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_negative_index_moves_to_front() {
        let fx = fixture().await;
        let result = MoveList::new(fx.lists[2].clone(), -3)
            .execute(&fx.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["final_index"], 0);
    }
}
