//! Move Orchestrator
//!
//! Wraps the reconciler in a store transaction. Every check and every write of a
//! bulk reorder or single move happens inside one `BEGIN IMMEDIATE` unit, so a
//! concurrent move on an overlapping parent either waits for this one to commit
//! or fails with a retryable conflict. Nothing is retried here.

use super::reconcile::{reconcile, ReconcileInput};
use crate::access::AccessScope;
use crate::error::{BoardError, Result};
use crate::store::{Collection, Store, StoreTx};
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Single-member move: where the member should end up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub member_id: String,
    pub target_parent_id: String,
    pub target_index: i64,
}

/// Where a moved member actually landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub member_id: String,
    pub final_parent_id: String,
    pub final_index: i64,
}

/// Applies reorders and moves atomically
#[derive(Clone)]
pub struct MoveOrchestrator {
    store: Store,
    access: Arc<dyn AccessScope>,
}

impl MoveOrchestrator {
    pub fn new(store: Store, access: Arc<dyn AccessScope>) -> Self {
        Self { store, access }
    }

    /// Assign `position = index` to every member of `parent_id` in the given
    /// order. The ids must be exactly the parent's current members.
    pub async fn reorder(
        &self,
        user: &UserId,
        collection: Collection,
        parent_id: &str,
        ordered_ids: Vec<String>,
    ) -> Result<()> {
        if ordered_ids.is_empty() {
            return Err(BoardError::validation(format!(
                "{} ids are required",
                collection.member_noun()
            )));
        }
        let mut seen = HashSet::with_capacity(ordered_ids.len());
        if let Some(dup) = ordered_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(BoardError::validation(format!(
                "{} {dup} listed more than once",
                collection.member_noun()
            )));
        }

        let access = Arc::clone(&self.access);
        let user = user.clone();
        let parent_id = parent_id.to_string();
        let count = ordered_ids.len();

        let result = self
            .store
            .write(move |tx| {
                ensure_parent(tx, collection, &parent_id)?;
                access.ensure(tx, &user, &collection.parent_scope(&parent_id))?;

                let current = tx.member_set(collection, &parent_id)?;
                if let Some(stray) = ordered_ids.iter().find(|id| !current.contains(*id)) {
                    return Err(BoardError::validation(format!(
                        "{} {stray} does not belong to {} {parent_id}",
                        collection.member_noun(),
                        collection.parent_noun()
                    )));
                }
                if current.len() != ordered_ids.len() {
                    return Err(BoardError::validation(format!(
                        "reorder must list all {} {}s of {} {parent_id}",
                        current.len(),
                        collection.member_noun(),
                        collection.parent_noun()
                    )));
                }

                for (index, id) in ordered_ids.iter().enumerate() {
                    tx.set_member_position(collection, id, &parent_id, index as i64)?;
                }
                Ok(())
            })
            .await;

        match &result {
            Ok(()) => debug!(collection = ?collection, count, "reorder committed"),
            Err(err) => debug!(collection = ?collection, error = %err, "reorder aborted"),
        }
        result
    }

    /// Move one member to `target_index` of `target_parent_id`
    pub async fn move_member(
        &self,
        user: &UserId,
        collection: Collection,
        request: MoveRequest,
    ) -> Result<MoveOutcome> {
        if request.member_id.is_empty() || request.target_parent_id.is_empty() {
            return Err(BoardError::validation(format!(
                "{} id and target {} id are required",
                collection.member_noun(),
                collection.parent_noun()
            )));
        }
        self.run_move(
            user,
            collection,
            request.member_id,
            Some(request.target_parent_id),
            request.target_index,
        )
        .await
    }

    /// Move one member to `target_index` within the parent it already has
    pub async fn move_within(
        &self,
        user: &UserId,
        collection: Collection,
        member_id: &str,
        target_index: i64,
    ) -> Result<MoveOutcome> {
        if member_id.is_empty() {
            return Err(BoardError::validation(format!(
                "{} id is required",
                collection.member_noun()
            )));
        }
        self.run_move(user, collection, member_id.to_string(), None, target_index)
            .await
    }

    async fn run_move(
        &self,
        user: &UserId,
        collection: Collection,
        member_id: String,
        target_parent_id: Option<String>,
        target_index: i64,
    ) -> Result<MoveOutcome> {
        debug!(collection = ?collection, member = %member_id, target_index, "move received");

        let access = Arc::clone(&self.access);
        let user = user.clone();
        let result = self
            .store
            .write(move |tx| {
                apply_move(
                    tx,
                    access.as_ref(),
                    &user,
                    collection,
                    &member_id,
                    target_parent_id,
                    target_index,
                )
            })
            .await;

        match &result {
            Ok(outcome) => debug!(
                collection = ?collection,
                member = %outcome.member_id,
                parent = %outcome.final_parent_id,
                index = outcome.final_index,
                "move committed"
            ),
            Err(err) => debug!(collection = ?collection, error = %err, "move aborted"),
        }
        result
    }
}

fn ensure_parent(tx: &StoreTx<'_>, collection: Collection, parent_id: &str) -> Result<()> {
    if tx.parent_exists(collection, parent_id)? {
        Ok(())
    } else {
        Err(BoardError::not_found(collection.parent_noun(), parent_id))
    }
}

fn apply_move(
    tx: &StoreTx<'_>,
    access: &dyn AccessScope,
    user: &UserId,
    collection: Collection,
    member_id: &str,
    target_parent_id: Option<String>,
    target_index: i64,
) -> Result<MoveOutcome> {
    let member = tx
        .get_member(collection, member_id)?
        .ok_or_else(|| BoardError::not_found(collection.member_noun(), member_id))?;
    let dest = target_parent_id.unwrap_or_else(|| member.parent_id.clone());
    let same_parent = dest == member.parent_id;

    if !same_parent {
        ensure_parent(tx, collection, &dest)?;
    }
    access.ensure(tx, user, &collection.parent_scope(&member.parent_id))?;
    if !same_parent {
        access.ensure(tx, user, &collection.parent_scope(&dest))?;
    }
    debug!(member = %member.id, "move authorized");

    let mut dest_count = tx.count_members(collection, &dest)?;
    if same_parent {
        dest_count -= 1;
    }
    let plan = reconcile(&ReconcileInput {
        old_parent_id: &member.parent_id,
        old_position: member.position,
        dest_parent_id: &dest,
        requested_index: target_index,
        dest_count,
    });
    debug!(
        member = %member.id,
        final_index = plan.final_index,
        shifts = plan.shifts.len(),
        "move reconciled"
    );

    for shift in &plan.shifts {
        tx.update_positions_where(collection, shift)?;
    }
    if plan.writes_member {
        tx.set_member_position(collection, &member.id, &dest, plan.final_index)?;
    }
    debug!(member = %member.id, "move applied");

    Ok(MoveOutcome {
        member_id: member.id,
        final_parent_id: dest,
        final_index: plan.final_index,
    })
}
