//! Activity trail endpoint

use super::ApiQuery;
use crate::error::ApiResult;
use crate::session::Authenticated;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::Value;
use taskboard_kanban::activity::ListActivity;
use taskboard_kanban::OperationProcessor;

/// `GET /api/activity?limit=`
pub async fn list(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiQuery(op): ApiQuery<ListActivity>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}
