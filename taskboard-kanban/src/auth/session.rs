//! Login sessions
//!
//! A session pairs an opaque id (sent as the `sid` cookie) with the user it
//! authenticates and a CSRF token the client must echo on every mutation.
//! The store is injected into whoever serves requests; nothing here is global.

use crate::types::UserId;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

/// Sessions last a day unless configured otherwise
pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Bytes of entropy in session ids and CSRF tokens
const TOKEN_BYTES: usize = 24;

/// 24 random bytes, URL-safe base64
pub fn random_token() -> String {
    URL_SAFE.encode(rand::random::<[u8; TOKEN_BYTES]>())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
    pub user_id: UserId,
    pub csrf_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Where sessions live between requests
pub trait SessionStore: Send + Sync {
    /// Start a new session for `user_id`
    fn create(&self, user_id: UserId) -> Session;

    /// Look up a live session. Expired sessions are dropped and not returned.
    fn get(&self, id: &str) -> Option<Session>;

    /// End a session, returning it if it existed
    fn remove(&self, id: &str) -> Option<Session>;

    /// Drop every expired session. Returns how many were dropped.
    fn purge_expired(&self) -> usize;
}

/// In-process session store over a sharded concurrent map
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, user_id: UserId) -> Session {
        let session = Session {
            id: random_token(),
            user_id,
            csrf_token: random_token(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.insert(session.id.clone(), session.clone());
        debug!(user = %session.user_id, "session created");
        session
    }

    fn get(&self, id: &str) -> Option<Session> {
        let session = self.sessions.get(id).map(|entry| entry.value().clone())?;
        if session.is_expired(Utc::now()) {
            self.sessions.remove(id);
            return None;
        }
        Some(session)
    }

    fn remove(&self, id: &str) -> Option<Session> {
        self.sessions.remove(id).map(|(_, session)| session)
    }

    fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        before.saturating_sub(self.sessions.len())
    }
}
