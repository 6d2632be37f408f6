//! Board endpoints

use super::{created, ApiJson, ApiQuery};
use crate::error::ApiResult;
use crate::session::Authenticated;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use taskboard_kanban::board::{AddBoard, GetBoard};
use taskboard_kanban::OperationProcessor;

/// `GET /api/boards?id=&include=`; without an id, the caller's first board
pub async fn get(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiQuery(op): ApiQuery<GetBoard>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn create(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<AddBoard>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    Ok(created(state.processor.process(&op, &auth.ctx).await?))
}
