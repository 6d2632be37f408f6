//! GetCurrentUser command

use super::find_by_id;
use crate::context::KanbanContext;
use crate::error::BoardError;
use crate::processor::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// The acting user's profile
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GetCurrentUser;

operation!(GetCurrentUser, verb = "get", noun = "user", description = "Read the logged-in user");

#[async_trait]
impl Execute<KanbanContext, BoardError> for GetCurrentUser {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, BoardError> {
        let result = async {
            let id = ctx.actor()?.clone();
            let user = ctx
                .store()
                .read(move |conn| {
                    find_by_id(conn, &id)?.ok_or_else(|| BoardError::not_found("user", id.as_str()))
                })
                .await?;
            Ok(serde_json::to_value(&user)?)
        }
        .await;

        unlogged(result)
    }
}
