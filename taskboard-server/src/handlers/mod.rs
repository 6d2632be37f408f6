//! Request handlers, one module per resource

pub mod activity;
pub mod auth;
pub mod boards;
pub mod comments;
pub mod lists;
pub mod tasks;
pub mod uploads;

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

/// JSON body whose rejections render as `{"error": ..}`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections render as `{"error": ..}`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// A created resource
pub(crate) fn created(value: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(value))
}

/// Liveness probe
pub async fn healthz() -> &'static str {
    "ok"
}
