//! Ordered Collection Store over SQLite
//!
//! One database file. Every unit of work opens its own connection on a blocking
//! thread, so request handlers share no in-process state and concurrent writers
//! are serialised by SQLite alone. Write units begin with `BEGIN IMMEDIATE`,
//! taking the reserved lock before the first read; a competing writer waits up
//! to the busy timeout and then fails with a retryable `Conflict`.

mod collection;
mod schema;

pub use collection::{Collection, Member};
pub(crate) use schema::create_schema;

use crate::error::Result;
use crate::ordering::{PositionRange, PositionShift};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default time a connection waits on a locked database
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the database file. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    path: Arc<PathBuf>,
    busy_timeout: Duration,
}

impl Store {
    /// Open the store at `path`, creating the schema if needed
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Open the store with an explicit busy timeout
    pub async fn open_with_timeout(path: impl Into<PathBuf>, busy_timeout: Duration) -> Result<Self> {
        let store = Self {
            path: Arc::new(path.into()),
            busy_timeout,
        };

        let migrate = store.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = migrate.connect()?;
            conn.pragma_update(None, "journal_mode", "WAL")?;
            create_schema(&conn)?;
            Ok(())
        })
        .await??;

        debug!(path = %store.path.display(), "store opened");
        Ok(store)
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(self.path.as_path())?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    /// Run a read-only unit of work against one consistent snapshot
    pub async fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.connect()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
            f(&tx)
        })
        .await?
    }

    /// Run a write unit of work in one immediate transaction.
    ///
    /// Commits when `f` returns `Ok`; any error rolls the whole unit back
    /// before it is returned.
    pub async fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreTx<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.connect()?;
            let tx = StoreTx {
                tx: conn.transaction_with_behavior(TransactionBehavior::Immediate)?,
            };

            match f(&tx) {
                Ok(value) => {
                    tx.tx.commit()?;
                    Ok(value)
                }
                Err(err) => {
                    if let Err(rollback) = tx.tx.rollback() {
                        warn!(error = %rollback, "rollback failed");
                    }
                    Err(err)
                }
            }
        })
        .await?
    }
}

/// An open write transaction.
///
/// Derefs to [`Connection`] for ordinary CRUD statements. The position
/// primitives below are the only code that writes a `position` column, and
/// only the ordering module calls them.
pub struct StoreTx<'c> {
    tx: Transaction<'c>,
}

impl Deref for StoreTx<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

impl StoreTx<'_> {
    /// Current placement of a member
    pub fn get_member(&self, collection: Collection, id: &str) -> Result<Option<Member>> {
        let member = self
            .prepare_cached(collection.sql().get_member)?
            .query_row([id], |row| {
                Ok(Member {
                    id: row.get(0)?,
                    parent_id: row.get(1)?,
                    position: row.get(2)?,
                })
            })
            .optional()?;
        Ok(member)
    }

    /// Number of members currently in a parent
    pub fn count_members(&self, collection: Collection, parent_id: &str) -> Result<i64> {
        let count = self
            .prepare_cached(collection.sql().count_members)?
            .query_row([parent_id], |row| row.get(0))?;
        Ok(count)
    }

    /// Ids of a parent's members in position order
    pub fn member_ids(&self, collection: Collection, parent_id: &str) -> Result<Vec<String>> {
        let mut stmt = self.prepare_cached(collection.sql().member_ids)?;
        let ids = stmt
            .query_map([parent_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    /// Member ids as a set, for membership checks
    pub fn member_set(&self, collection: Collection, parent_id: &str) -> Result<HashSet<String>> {
        Ok(self.member_ids(collection, parent_id)?.into_iter().collect())
    }

    pub fn parent_exists(&self, collection: Collection, parent_id: &str) -> Result<bool> {
        let exists = self
            .prepare_cached(collection.sql().parent_exists)?
            .query_row([parent_id], |row| row.get(0))?;
        Ok(exists)
    }

    /// Apply one range shift. Returns the number of rows touched.
    pub(crate) fn update_positions_where(
        &self,
        collection: Collection,
        shift: &PositionShift,
    ) -> Result<usize> {
        let sql = collection.sql();
        let delta = shift.delta.amount();
        let touched = match shift.range {
            PositionRange::From(n) => self
                .prepare_cached(sql.shift_from)?
                .execute(params![shift.parent_id, delta, n])?,
            PositionRange::After(n) => self
                .prepare_cached(sql.shift_after)?
                .execute(params![shift.parent_id, delta, n])?,
            PositionRange::Between { start, end } => self
                .prepare_cached(sql.shift_between)?
                .execute(params![shift.parent_id, delta, start, end])?,
        };
        debug!(
            collection = ?collection,
            parent = %shift.parent_id,
            range = ?shift.range,
            delta,
            touched,
            "shifted positions"
        );
        Ok(touched)
    }

    /// Write a member's parent and position
    pub(crate) fn set_member_position(
        &self,
        collection: Collection,
        id: &str,
        parent_id: &str,
        position: i64,
    ) -> Result<()> {
        self.prepare_cached(collection.sql().set_member_position)?
            .execute(params![id, parent_id, position])?;
        Ok(())
    }

    pub(crate) fn delete_member(&self, collection: Collection, id: &str) -> Result<bool> {
        let deleted = self
            .prepare_cached(collection.sql().delete_member)?
            .execute([id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::ordering::Delta;
    use tempfile::TempDir;

    async fn store() -> (TempDir, Store) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().join("board.db")).await.unwrap();
        (temp, store)
    }

    /// Seed one board with `n` lists at positions 0..n
    async fn seed_lists(store: &Store, n: i64) {
        store
            .write(move |tx| {
                tx.execute_batch(
                    "INSERT INTO users VALUES ('u1', 'a@b.c', 'A', 'x', '2024-01-01');
                     INSERT INTO workspaces VALUES ('w1', 'W', NULL, '2024-01-01');
                     INSERT INTO boards VALUES ('b1', 'w1', 'B', 'u1', '2024-01-01');",
                )?;
                for i in 0..n {
                    tx.execute(
                        "INSERT INTO lists VALUES (?1, 'b1', ?1, ?2, '2024-01-01')",
                        params![format!("l{i}"), i],
                    )?;
                }
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_creates_schema() {
        let (_temp, store) = store().await;
        let count: i64 = store
            .read(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM lists", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_member_primitives() {
        let (_temp, store) = store().await;
        seed_lists(&store, 3).await;

        let (member, count, exists, missing) = store
            .write(|tx| {
                Ok((
                    tx.get_member(Collection::Lists, "l1")?,
                    tx.count_members(Collection::Lists, "b1")?,
                    tx.parent_exists(Collection::Lists, "b1")?,
                    tx.get_member(Collection::Lists, "nope")?,
                ))
            })
            .await
            .unwrap();

        assert_eq!(
            member,
            Some(Member {
                id: "l1".into(),
                parent_id: "b1".into(),
                position: 1
            })
        );
        assert_eq!(count, 3);
        assert!(exists);
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_shift_is_scoped_to_range() {
        let (_temp, store) = store().await;
        seed_lists(&store, 4).await;

        let ids = store
            .write(|tx| {
                let touched = tx.update_positions_where(
                    Collection::Lists,
                    &PositionShift {
                        parent_id: "b1".into(),
                        range: PositionRange::Between { start: 1, end: 2 },
                        delta: Delta::Increment,
                    },
                )?;
                assert_eq!(touched, 2);
                tx.set_member_position(Collection::Lists, "l3", "b1", 1)?;
                tx.member_ids(Collection::Lists, "b1")
            })
            .await
            .unwrap();

        assert_eq!(ids, vec!["l0", "l3", "l1", "l2"]);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let (_temp, store) = store().await;
        seed_lists(&store, 2).await;

        let result: Result<()> = store
            .write(|tx| {
                tx.delete_member(Collection::Lists, "l0")?;
                Err(BoardError::validation("abort"))
            })
            .await;
        assert!(result.is_err());

        let ids = store
            .write(|tx| tx.member_ids(Collection::Lists, "b1"))
            .await
            .unwrap();
        assert_eq!(ids, vec!["l0", "l1"]);
    }
}
