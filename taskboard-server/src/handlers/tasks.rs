//! Task endpoints

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
use taskboard_kanban::task::{
    AddTask, AssignTask, DeleteTask, GetTask, MoveTask, ReorderTasks, UnassignTask, UpdateTask,
};
use taskboard_kanban::types::{TaskId, UserId};
use taskboard_kanban::OperationProcessor;

pub async fn create(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<AddTask>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    Ok(created(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn get(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&GetTask::new(id), &auth.ctx).await?))
}

/// Fields a PATCH may change; at least one is required
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub async fn update(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> ApiResult<Json<Value>> {
    let op = UpdateTask {
        id,
        title: patch.title,
        description: patch.description,
    };
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn delete(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&DeleteTask::new(id), &auth.ctx).await?))
}

pub async fn reorder(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<ReorderTasks>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn mv(
    auth: Authenticated,
    State(state): State<AppState>,
    ApiJson(op): ApiJson<MoveTask>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: UserId,
}

pub async fn assign(
    auth: Authenticated,
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    ApiJson(body): ApiJson<AssignRequest>,
) -> ApiResult<Json<Value>> {
    let op = AssignTask::new(id, body.user_id);
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}

pub async fn unassign(
    auth: Authenticated,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(TaskId, UserId)>,
) -> ApiResult<Json<Value>> {
    let op = UnassignTask::new(id, user_id);
    Ok(Json(state.processor.process(&op, &auth.ctx).await?))
}
