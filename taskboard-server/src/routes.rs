//! Router assembly

use crate::handlers::{activity, auth, boards, comments, healthz, lists, tasks, uploads};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

/// Every route, with request tracing
pub fn router(state: AppState) -> Router {
    let upload_limit = state.upload_limit_bytes;
    let upload_dir = state.upload_dir.clone();

    let uploads = Router::new()
        .route("/api/uploads", post(uploads::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
        .route("/api/boards", get(boards::get).post(boards::create))
        .route("/api/lists", post(lists::create))
        .route("/api/lists/reorder", post(lists::reorder))
        .route("/api/lists/move", post(lists::mv))
        .route("/api/lists/:id", patch(lists::rename).delete(lists::delete))
        .route("/api/tasks", post(tasks::create))
        .route("/api/tasks/reorder", post(tasks::reorder))
        .route("/api/tasks/move", post(tasks::mv))
        .route(
            "/api/tasks/:id",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
        .route("/api/tasks/:id/assignees", post(tasks::assign))
        .route("/api/tasks/:id/assignees/:user_id", delete(tasks::unassign))
        .route("/api/comments", get(comments::list).post(comments::add))
        .route("/api/activity", get(activity::list))
        .merge(uploads)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
