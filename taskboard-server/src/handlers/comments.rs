//! Comment endpoints

use super::{created, ApiJson, ApiQuery};
use crate::error::ApiResult;
use crate::session::Authenticated;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use taskboard_kanban::comment::{AddComment, ListComments};
use taskboard_kanban::OperationProcessor;

/// `GET /api/comments?task_id=`
pub async fn list(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiQuery(op): ApiQuery<ListComments>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn add(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<AddComment>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    Ok(created(state.processor.process(&op, &auth.ctx).await?))
}
