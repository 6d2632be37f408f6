//! Registration, login, logout and the current user

use super::{created, ApiJson};
use crate::error::ApiResult;
use crate::session::{cookie, expired_cookies, session_cookies, Authenticated, SESSION_COOKIE};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use taskboard_kanban::types::UserId;
use taskboard_kanban::user::{AuthenticateUser, GetCurrentUser, RegisterUser};
use taskboard_kanban::{BoardError, OperationProcessor};
use tracing::info;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(op): ApiJson<RegisterUser>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let value = state.processor.process(&op, &state.kanban).await?;
    Ok(created(value))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .processor
        .process(&AuthenticateUser::new(request.email, request.password), &state.kanban)
        .await?;
    let user_id = user["id"]
        .as_str()
        .map(UserId::from_string)
        .ok_or_else(|| BoardError::not_found("user", "id"))?;

    let session = state.sessions.create(user_id.clone());
    info!(user = %user_id, "logged in");

    Ok((
        AppendHeaders(session_cookies(&session).map(|value| (SET_COOKIE, value))),
        Json(json!({ "user_id": user_id, "user": user })),
    ))
}

/// Best-effort: drops the session named by the cookie, if any, and always
/// expires both cookies
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(sid) = cookie(&headers, SESSION_COOKIE) {
        if let Some(session) = state.sessions.remove(sid) {
            info!(user = %session.user_id, "logged out");
        }
    }
    (
        AppendHeaders(expired_cookies().map(|value| (SET_COOKIE, value))),
        Json(json!({ "ok": true })),
    )
}

pub async fn me(auth: Authenticated, State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(state.processor.process(&GetCurrentUser, &auth.ctx).await?))
}
