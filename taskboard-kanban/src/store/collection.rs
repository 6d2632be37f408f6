//! Ordered collections and their static SQL
//!
//! Each collection is a `(table, parent column)` pair fixed at compile time.
//! The statements are assembled with `concat!`, so nothing about a query is
//! decided at runtime except its bound parameters.

use crate::access::ScopeTarget;
use crate::types::{BoardId, ListId};
use serde::{Deserialize, Serialize};

/// An ordered collection: lists within a board, or tasks within a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Lists,
    Tasks,
}

impl Collection {
    /// Entity name of a member, used in error messages
    pub fn member_noun(&self) -> &'static str {
        match self {
            Self::Lists => "list",
            Self::Tasks => "task",
        }
    }

    /// Entity name of the parent, used in error messages
    pub fn parent_noun(&self) -> &'static str {
        match self {
            Self::Lists => "board",
            Self::Tasks => "list",
        }
    }

    /// The authorization target guarding a parent of this collection
    pub fn parent_scope(&self, parent_id: &str) -> ScopeTarget {
        match self {
            Self::Lists => ScopeTarget::Board(BoardId::from_string(parent_id)),
            Self::Tasks => ScopeTarget::List(ListId::from_string(parent_id)),
        }
    }

    pub(crate) fn sql(&self) -> &'static PositionalSql {
        match self {
            Self::Lists => &LISTS_SQL,
            Self::Tasks => &TASKS_SQL,
        }
    }
}

/// A member's placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: String,
    pub parent_id: String,
    pub position: i64,
}

/// The fixed statements the position engine runs against one collection
pub(crate) struct PositionalSql {
    pub get_member: &'static str,
    pub count_members: &'static str,
    pub member_ids: &'static str,
    pub parent_exists: &'static str,
    pub set_member_position: &'static str,
    pub delete_member: &'static str,
    pub shift_from: &'static str,
    pub shift_after: &'static str,
    pub shift_between: &'static str,
}

macro_rules! positional_sql {
    ($table:literal, $parent:literal, $parent_table:literal) => {
        PositionalSql {
            get_member: concat!(
                "SELECT id, ", $parent, ", position FROM ", $table, " WHERE id = ?1"
            ),
            count_members: concat!("SELECT COUNT(*) FROM ", $table, " WHERE ", $parent, " = ?1"),
            member_ids: concat!(
                "SELECT id FROM ", $table, " WHERE ", $parent, " = ?1 ORDER BY position, id"
            ),
            parent_exists: concat!(
                "SELECT EXISTS(SELECT 1 FROM ", $parent_table, " WHERE id = ?1)"
            ),
            set_member_position: concat!(
                "UPDATE ", $table, " SET ", $parent, " = ?2, position = ?3 WHERE id = ?1"
            ),
            delete_member: concat!("DELETE FROM ", $table, " WHERE id = ?1"),
            shift_from: concat!(
                "UPDATE ", $table, " SET position = position + ?2 WHERE ", $parent,
                " = ?1 AND position >= ?3"
            ),
            shift_after: concat!(
                "UPDATE ", $table, " SET position = position + ?2 WHERE ", $parent,
                " = ?1 AND position > ?3"
            ),
            shift_between: concat!(
                "UPDATE ", $table, " SET position = position + ?2 WHERE ", $parent,
                " = ?1 AND position BETWEEN ?3 AND ?4"
            ),
        }
    };
}

static LISTS_SQL: PositionalSql = positional_sql!("lists", "board_id", "boards");
static TASKS_SQL: PositionalSql = positional_sql!("tasks", "list_id", "lists");
