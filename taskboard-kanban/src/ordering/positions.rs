//! Creation and deletion bookkeeping for ordered collections

use super::{Delta, PositionRange, PositionShift};
use crate::error::{BoardError, Result};
use crate::store::{Collection, Member, StoreTx};

/// Position a new member takes when appended to `parent_id`
pub fn append_position(tx: &StoreTx<'_>, collection: Collection, parent_id: &str) -> Result<i64> {
    tx.count_members(collection, parent_id)
}

/// Delete a member and close the gap it leaves in its parent.
///
/// Returns the removed member's last placement.
pub fn remove_member(tx: &StoreTx<'_>, collection: Collection, id: &str) -> Result<Member> {
    let member = tx
        .get_member(collection, id)?
        .ok_or_else(|| BoardError::not_found(collection.member_noun(), id))?;

    tx.delete_member(collection, id)?;
    tx.update_positions_where(
        collection,
        &PositionShift {
            parent_id: member.parent_id.clone(),
            range: PositionRange::After(member.position),
            delta: Delta::Decrement,
        },
    )?;

    Ok(member)
}
