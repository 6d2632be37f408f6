//! Session cookies and the authenticated-request extractor
//!
//! `sid` carries the session id and is HttpOnly. `csrf` carries the session's
//! CSRF token and is readable by scripts, which echo it back in the
//! `X-CSRF-Token` header on every unsafe request.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::Utc;
use taskboard_kanban::auth::Session;
use taskboard_kanban::KanbanContext;

pub const SESSION_COOKIE: &str = "sid";
pub const CSRF_COOKIE: &str = "csrf";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Value of the named cookie, if the request carries it
pub fn cookie<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` values that establish `session`
pub fn session_cookies(session: &Session) -> [String; 2] {
    let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
    [
        format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
            session.id
        ),
        format!(
            "{CSRF_COOKIE}={}; Path=/; SameSite=Lax; Max-Age={max_age}",
            session.csrf_token
        ),
    ]
}

/// `Set-Cookie` values that clear both cookies
pub fn expired_cookies() -> [String; 2] {
    [
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
        format!("{CSRF_COOKIE}=; Path=/; SameSite=Lax; Max-Age=0"),
    ]
}

/// A request with a live session. Unsafe methods must also carry the
/// session's CSRF token.
pub struct Authenticated {
    pub session: Session,
    /// The shared context acting as the session's user
    pub ctx: KanbanContext,
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = cookie(&parts.headers, SESSION_COOKIE)
            .and_then(|sid| state.sessions.get(sid))
            .ok_or(ApiError::NoSession)?;

        if !parts.method.is_safe() {
            let token = parts
                .headers
                .get(CSRF_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            if token.is_empty() || token != session.csrf_token {
                return Err(ApiError::Csrf);
            }
        }

        let ctx = state.kanban.for_user(session.user_id.clone());
        Ok(Self { session, ctx })
    }
}
