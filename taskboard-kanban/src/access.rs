//! Access Scope Resolver
//!
//! Decides whether a user's workspace membership covers a target. Evaluated on
//! the caller's open connection so the answer belongs to the same transaction
//! as the write it guards.

use crate::error::{BoardError, Result};
use crate::types::{BoardId, ListId, TaskId, UserId, WorkspaceId};
use rusqlite::Connection;
use std::fmt;

/// Something access can be granted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeTarget {
    Workspace(WorkspaceId),
    Board(BoardId),
    List(ListId),
    Task(TaskId),
}

impl fmt::Display for ScopeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workspace(id) => write!(f, "workspace {id}"),
            Self::Board(id) => write!(f, "board {id}"),
            Self::List(id) => write!(f, "list {id}"),
            Self::Task(id) => write!(f, "task {id}"),
        }
    }
}

/// Authorization seam consumed by every command that touches a board
pub trait AccessScope: Send + Sync {
    fn is_authorized(&self, conn: &Connection, user: &UserId, target: &ScopeTarget) -> Result<bool>;

    /// Fail with `Forbidden` unless the user is authorized
    fn ensure(&self, conn: &Connection, user: &UserId, target: &ScopeTarget) -> Result<()> {
        if self.is_authorized(conn, user, target)? {
            Ok(())
        } else {
            Err(BoardError::forbidden(format!("no access to {target}")))
        }
    }
}

/// Grants access when a `workspace_members` row links the user to the
/// workspace that owns the target
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceMembership;

impl AccessScope for WorkspaceMembership {
    fn is_authorized(&self, conn: &Connection, user: &UserId, target: &ScopeTarget) -> Result<bool> {
        let (sql, id) = match target {
            ScopeTarget::Workspace(id) => (
                "SELECT EXISTS(SELECT 1 FROM workspace_members m
                 WHERE m.workspace_id = ?1 AND m.user_id = ?2)",
                id.as_str(),
            ),
            ScopeTarget::Board(id) => (
                "SELECT EXISTS(SELECT 1 FROM boards b
                 JOIN workspace_members m ON m.workspace_id = b.workspace_id
                 WHERE b.id = ?1 AND m.user_id = ?2)",
                id.as_str(),
            ),
            ScopeTarget::List(id) => (
                "SELECT EXISTS(SELECT 1 FROM lists l
                 JOIN boards b ON b.id = l.board_id
                 JOIN workspace_members m ON m.workspace_id = b.workspace_id
                 WHERE l.id = ?1 AND m.user_id = ?2)",
                id.as_str(),
            ),
            ScopeTarget::Task(id) => (
                "SELECT EXISTS(SELECT 1 FROM tasks t
                 JOIN lists l ON l.id = t.list_id
                 JOIN boards b ON b.id = l.board_id
                 JOIN workspace_members m ON m.workspace_id = b.workspace_id
                 WHERE t.id = ?1 AND m.user_id = ?2)",
                id.as_str(),
            ),
        };

        let granted = conn
            .prepare_cached(sql)?
            .query_row([id, user.as_str()], |row| row.get(0))?;
        Ok(granted)
    }
}
