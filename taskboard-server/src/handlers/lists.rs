//! List endpoints

use super::{created, ApiJson};
use crate::error::ApiResult;
use crate::session::Authenticated;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use taskboard_kanban::list::{AddList, DeleteList, MoveList, ReorderLists, UpdateList};
use taskboard_kanban::types::ListId;
use taskboard_kanban::OperationProcessor;

pub async fn create(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<AddList>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    Ok(created(state.processor.process(&op, &auth.ctx).await?))
}

#[derive(Debug, Deserialize)]
pub struct RenameList {
    pub name: String,
}

pub async fn rename(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(id): Path<ListId>,
    ApiJson(body): ApiJson<RenameList>,
) -> ApiResult<Json<Value>> {
    let op = UpdateList::new(id, body.name);
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn delete(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(id): Path<ListId>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&DeleteList::new(id), &auth.ctx).await?))
}

pub async fn reorder(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<ReorderLists>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn mv(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<MoveList>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}
