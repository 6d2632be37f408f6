//! KanbanContext - what every command runs against
//!
//! The context carries the store handle, the access policy, the acting user and
//! the password hashing cost. It holds no business logic; commands do the work.
//! Cloning is cheap, and [`KanbanContext::for_user`] derives a per-request
//! context from a shared one.

use crate::access::{AccessScope, WorkspaceMembership};
use crate::auth::HashingCost;
use crate::error::{BoardError, Result};
use crate::ordering::MoveOrchestrator;
use crate::store::Store;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use rusqlite::params;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use taskboard_operations::LogEntry;

/// Default number of activity entries returned when no limit is given
pub const DEFAULT_ACTIVITY_LIMIT: usize = 50;

/// Context passed to every command
#[derive(Clone)]
pub struct KanbanContext {
    store: Store,
    access: Arc<dyn AccessScope>,
    actor: Option<UserId>,
    hashing: HashingCost,
}

impl KanbanContext {
    /// Wrap an open store with the default access policy and no actor
    pub fn new(store: Store) -> Self {
        Self {
            store,
            access: Arc::new(WorkspaceMembership),
            actor: None,
            hashing: HashingCost::default(),
        }
    }

    /// Open (and migrate) the database at `path`
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(Store::open(path).await?))
    }

    /// Open with an explicit busy timeout
    pub async fn open_with_timeout(path: impl Into<PathBuf>, busy_timeout: Duration) -> Result<Self> {
        Ok(Self::new(
            Store::open_with_timeout(path, busy_timeout).await?,
        ))
    }

    /// Replace the access policy
    pub fn with_access(mut self, access: Arc<dyn AccessScope>) -> Self {
        self.access = access;
        self
    }

    /// Replace the cost used to hash new passwords
    pub fn with_hashing_cost(mut self, cost: HashingCost) -> Self {
        self.hashing = cost;
        self
    }

    /// A copy of this context acting as `user`
    pub fn for_user(&self, user: UserId) -> Self {
        Self {
            actor: Some(user),
            ..self.clone()
        }
    }

    /// The acting user, required by every command that touches a board
    pub fn actor(&self) -> Result<&UserId> {
        self.actor
            .as_ref()
            .ok_or_else(|| BoardError::unauthorized("not logged in"))
    }

    pub fn actor_id(&self) -> Option<&UserId> {
        self.actor.as_ref()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn access(&self) -> Arc<dyn AccessScope> {
        Arc::clone(&self.access)
    }

    pub fn hashing_cost(&self) -> HashingCost {
        self.hashing
    }

    /// The orchestrator for moves and reorders, sharing this context's store
    /// and access policy
    pub fn orchestrator(&self) -> MoveOrchestrator {
        MoveOrchestrator::new(self.store.clone(), self.access())
    }

    // =========================================================================
    // Activity log
    // =========================================================================

    /// Persist one log entry
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        let input = serde_json::to_string(&entry.input)?;
        let output = serde_json::to_string(&entry.output)?;
        let entry = entry.clone();

        self.store
            .write(move |tx| {
                tx.execute(
                    "INSERT INTO activity (id, timestamp, op, input, output, actor, duration_ms)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        entry.id,
                        entry.timestamp,
                        entry.op,
                        input,
                        output,
                        entry.actor,
                        entry.duration_ms as i64
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Entries recorded for `actor`, newest first
    pub async fn read_activity(&self, actor: &UserId, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let actor = actor.clone();
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT) as i64;

        self.store
            .read(move |conn| {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, timestamp, op, input, output, actor, duration_ms
                     FROM activity WHERE actor = ?1
                     ORDER BY timestamp DESC, id DESC LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(params![actor, limit], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, DateTime<Utc>>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, Option<String>>(5)?,
                            row.get::<_, i64>(6)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                rows.into_iter()
                    .map(|(id, timestamp, op, input, output, actor, duration_ms)| -> Result<LogEntry> {
                        Ok(LogEntry {
                            id,
                            timestamp,
                            op,
                            input: serde_json::from_str(&input)?,
                            output: serde_json::from_str(&output)?,
                            actor,
                            duration_ms: duration_ms.max(0) as u64,
                        })
                    })
                    .collect()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_actor_required() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::open(temp.path().join("t.db")).await.unwrap();
        assert!(matches!(ctx.actor(), Err(BoardError::Unauthorized { .. })));

        let ctx = ctx.for_user(UserId::from_string("u1"));
        assert_eq!(ctx.actor().unwrap().as_str(), "u1");
    }

    #[tokio::test]
    async fn test_activity_round_trip_newest_first() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::open(temp.path().join("t.db")).await.unwrap();

        let first = LogEntry::new("add task", json!({"title": "a"}), json!({"id": "t1"}), None, 1)
            .with_actor("u1");
        let mut second = LogEntry::new("move task", json!({}), json!({}), None, 2).with_actor("u1");
        second.timestamp = first.timestamp + chrono::Duration::seconds(1);
        let other = LogEntry::new("add list", json!({}), json!({}), None, 0).with_actor("u2");

        for entry in [&first, &second, &other] {
            ctx.append_activity(entry).await.unwrap();
        }

        let entries = ctx
            .read_activity(&UserId::from_string("u1"), None)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].op, "move task");
        assert_eq!(entries[1].input["title"], "a");

        let limited = ctx
            .read_activity(&UserId::from_string("u1"), Some(1))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }
}
