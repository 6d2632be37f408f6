//! Shared fixtures for unit tests

use crate::auth::HashingCost;
use crate::context::KanbanContext;
use crate::store::Collection;
use crate::types::{BoardId, ListId, TaskId, UserId, WorkspaceId};
use chrono::Utc;
use rusqlite::params;
use tempfile::TempDir;

/// Cheap enough to hash in debug builds
pub(crate) const TEST_HASHING_COST: HashingCost = HashingCost {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

/// A board `alice` owns with three empty lists. `bob` exists but belongs to
/// no workspace.
pub(crate) struct Fixture {
    pub _temp: TempDir,
    pub ctx: KanbanContext,
    pub alice: UserId,
    pub bob: UserId,
    pub workspace: WorkspaceId,
    pub board: BoardId,
    pub lists: Vec<ListId>,
}

impl Fixture {
    /// The fixture's context acting as bob
    pub fn as_bob(&self) -> KanbanContext {
        self.ctx.for_user(self.bob.clone())
    }
}

pub(crate) async fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let ctx = KanbanContext::open(temp.path().join("kanban.db"))
        .await
        .unwrap()
        .with_hashing_cost(TEST_HASHING_COST);

    let alice = UserId::new();
    let bob = UserId::new();
    let workspace = WorkspaceId::new();
    let board = BoardId::new();
    let lists: Vec<ListId> = (0..3).map(|_| ListId::new()).collect();

    {
        let (alice, bob, workspace, board, lists) = (
            alice.clone(),
            bob.clone(),
            workspace.clone(),
            board.clone(),
            lists.clone(),
        );
        ctx.store()
            .write(move |tx| {
                let now = Utc::now();
                for (id, email, name) in [(&alice, "alice@example.com", "Alice"), (&bob, "bob@example.com", "Bob")] {
                    tx.execute(
                        "INSERT INTO users (id, email, name, password_hash, created_at) VALUES (?1, ?2, ?3, 'x', ?4)",
                        params![id, email, name, now],
                    )?;
                }
                tx.execute(
                    "INSERT INTO workspaces (id, name, created_at) VALUES (?1, 'Team', ?2)",
                    params![workspace, now],
                )?;
                tx.execute(
                    "INSERT INTO workspace_members (workspace_id, user_id, role) VALUES (?1, ?2, 'owner')",
                    params![workspace, alice],
                )?;
                tx.execute(
                    "INSERT INTO boards (id, workspace_id, name, owner_id, created_at) VALUES (?1, ?2, 'Board', ?3, ?4)",
                    params![board, workspace, alice, now],
                )?;
                for (position, (list, name)) in lists.iter().zip(["To Do", "Doing", "Done"]).enumerate() {
                    tx.execute(
                        "INSERT INTO lists (id, board_id, name, position, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                        params![list, board, name, position as i64, now],
                    )?;
                }
                Ok(())
            })
            .await
            .unwrap();
    }

    Fixture {
        ctx: ctx.for_user(alice.clone()),
        _temp: temp,
        alice,
        bob,
        workspace,
        board,
        lists,
    }
}

/// Append `n` tasks to `list` at positions after any it already has
pub(crate) async fn seed_tasks(ctx: &KanbanContext, list: &ListId, n: usize) -> Vec<TaskId> {
    let list = list.clone();
    let creator = ctx.actor().unwrap().clone();
    ctx.store()
        .write(move |tx| {
            let now = Utc::now();
            let base = tx.count_members(Collection::Tasks, list.as_str())?;
            let mut ids = Vec::with_capacity(n);
            for i in 0..n {
                let id = TaskId::new();
                tx.execute(
                    "INSERT INTO tasks (id, list_id, title, position, created_by, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    params![id, list, format!("task {i}"), base + i as i64, creator, now],
                )?;
                ids.push(id);
            }
            Ok(ids)
        })
        .await
        .unwrap()
}

/// Member ids of a parent in position order
pub(crate) async fn member_order(ctx: &KanbanContext, collection: Collection, parent: &str) -> Vec<String> {
    let parent = parent.to_string();
    ctx.store()
        .write(move |tx| tx.member_ids(collection, &parent))
        .await
        .unwrap()
}

/// Sorted positions of a parent's members
pub(crate) async fn positions(ctx: &KanbanContext, collection: Collection, parent: &str) -> Vec<i64> {
    let table = match collection {
        Collection::Lists => "SELECT position FROM lists WHERE board_id = ?1 ORDER BY position",
        Collection::Tasks => "SELECT position FROM tasks WHERE list_id = ?1 ORDER BY position",
    };
    let parent = parent.to_string();
    ctx.store()
        .read(move |conn| {
            let mut stmt = conn.prepare(table)?;
            let rows = stmt
                .query_map([parent], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(rows)
        })
        .await
        .unwrap()
}
