//! Starter workspace for new users
//!
//! Runs after the user row has committed, in its own transaction. Failure never
//! undoes the registration; the caller gets an explicit [`Provisioning`] value
//! either way.

use crate::board::insert_board;
use crate::context::KanbanContext;
use crate::error::Result;
use crate::list::insert_list;
use crate::store::StoreTx;
use crate::task::insert_task;
use crate::types::{BoardId, MemberRole, User, UserId, WorkspaceId, DEFAULT_LIST_NAMES};
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const STARTER_BOARD_NAME: &str = "My Board";

/// `(title, description)` of the tasks seeded into the first list
pub const STARTER_TASKS: [(&str, &str); 3] = [
    (
        "Welcome to your board",
        "Drag cards between lists as work progresses.",
    ),
    (
        "Create your first task",
        "Click + to add tasks. Assign teammates later.",
    ),
    (
        "Invite a teammate",
        "Collaborate by inviting others to your workspace.",
    ),
];

/// What registration did beyond creating the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Provisioning {
    Provisioned {
        workspace_id: WorkspaceId,
        board_id: BoardId,
    },
    Skipped {
        reason: String,
    },
}

/// Create the user's personal workspace, board, lists and starter tasks in
/// one transaction
pub async fn provision_workspace(ctx: &KanbanContext, user: &User) -> Provisioning {
    let user_id = user.id.clone();
    let workspace_name = format!("{}'s Workspace", user.name);

    match ctx
        .store()
        .write(move |tx| seed(tx, &user_id, &workspace_name))
        .await
    {
        Ok((workspace_id, board_id)) => {
            info!(user = %user.id, workspace = %workspace_id, "provisioned starter workspace");
            Provisioning::Provisioned {
                workspace_id,
                board_id,
            }
        }
        Err(err) => {
            warn!(user = %user.id, error = %err, "provisioning skipped");
            Provisioning::Skipped {
                reason: err.to_string(),
            }
        }
    }
}

fn seed(tx: &StoreTx<'_>, user: &UserId, workspace_name: &str) -> Result<(WorkspaceId, BoardId)> {
    let workspace_id = WorkspaceId::new();
    tx.execute(
        "INSERT INTO workspaces (id, name, created_at) VALUES (?1, ?2, ?3)",
        params![workspace_id, workspace_name, Utc::now()],
    )?;
    tx.execute(
        "INSERT INTO workspace_members (workspace_id, user_id, role) VALUES (?1, ?2, ?3)",
        params![workspace_id, user, MemberRole::Owner.as_str()],
    )?;

    let board = insert_board(tx, &workspace_id, STARTER_BOARD_NAME, user)?;
    let mut lists = Vec::with_capacity(DEFAULT_LIST_NAMES.len());
    for name in DEFAULT_LIST_NAMES {
        lists.push(insert_list(tx, &board.id, name)?);
    }
    if let Some(first) = lists.first() {
        for (title, description) in STARTER_TASKS {
            insert_task(tx, &first.id, title, description, user)?;
        }
    }

    Ok((workspace_id, board.id))
}
