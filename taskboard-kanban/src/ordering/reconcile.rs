//! Position reconciliation
//!
//! Pure computation, no I/O. Given where a member sits now and where the caller
//! wants it, produce the clamped final index plus the per-parent range shifts
//! that keep every parent's positions dense (`0..count-1`, no gaps, no
//! duplicates) once the moving member's own row is rewritten.
//!
//! Shifts are returned in application order. For a cross-parent move the source
//! gap is closed before the destination slot is opened; callers must apply them
//! in the order given and only then write the moving member.

use serde::{Deserialize, Serialize};

/// Inclusive position predicate for a range update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionRange {
    /// `position >= n`
    From(i64),
    /// `position > n`
    After(i64),
    /// `start <= position <= end`
    Between { start: i64, end: i64 },
}

impl PositionRange {
    pub fn contains(&self, position: i64) -> bool {
        match *self {
            Self::From(n) => position >= n,
            Self::After(n) => position > n,
            Self::Between { start, end } => start <= position && position <= end,
        }
    }
}

/// Direction of a range update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delta {
    Increment,
    Decrement,
}

impl Delta {
    pub fn amount(self) -> i64 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }
}

/// A range update scoped to exactly one parent collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionShift {
    pub parent_id: String,
    pub range: PositionRange,
    pub delta: Delta,
}

impl PositionShift {
    fn new(parent_id: &str, range: PositionRange, delta: Delta) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            range,
            delta,
        }
    }
}

/// Inputs to [`reconcile`]
#[derive(Debug, Clone)]
pub struct ReconcileInput<'a> {
    pub old_parent_id: &'a str,
    pub old_position: i64,
    pub dest_parent_id: &'a str,
    pub requested_index: i64,
    /// Members in the destination, not counting the moving member when it
    /// already lives there
    pub dest_count: i64,
}

impl ReconcileInput<'_> {
    pub fn is_same_parent(&self) -> bool {
        self.old_parent_id == self.dest_parent_id
    }
}

/// Output of [`reconcile`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub final_index: i64,
    /// Range updates, in the order they must be applied
    pub shifts: Vec<PositionShift>,
    /// Whether the moving member's own row must be rewritten
    pub writes_member: bool,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        !self.writes_member && self.shifts.is_empty()
    }
}

/// Clamp a requested index to the legal insertion range.
///
/// Negative requests become 0. Within the same parent the last legal index is
/// the last occupied slot, which equals `dest_count` because the moving member
/// is excluded from it. Across parents the member may also be appended after
/// the current last member, so `dest_count` itself is legal there too.
/// Either way the upper bound is `dest_count`.
pub fn clamp_index(requested: i64, dest_count: i64) -> i64 {
    requested.clamp(0, dest_count.max(0))
}

/// Compute the final index and shift instructions for a move
pub fn reconcile(input: &ReconcileInput<'_>) -> Reconciliation {
    let same_parent = input.is_same_parent();
    let final_index = clamp_index(input.requested_index, input.dest_count);
    let old = input.old_position;

    if same_parent {
        if final_index == old {
            return Reconciliation {
                final_index,
                shifts: Vec::new(),
                writes_member: false,
            };
        }

        let shift = if final_index < old {
            PositionShift::new(
                input.old_parent_id,
                PositionRange::Between {
                    start: final_index,
                    end: old - 1,
                },
                Delta::Increment,
            )
        } else {
            PositionShift::new(
                input.old_parent_id,
                PositionRange::Between {
                    start: old + 1,
                    end: final_index,
                },
                Delta::Decrement,
            )
        };

        return Reconciliation {
            final_index,
            shifts: vec![shift],
            writes_member: true,
        };
    }

    Reconciliation {
        final_index,
        shifts: vec![
            PositionShift::new(
                input.old_parent_id,
                PositionRange::After(old),
                Delta::Decrement,
            ),
            PositionShift::new(
                input.dest_parent_id,
                PositionRange::From(final_index),
                Delta::Increment,
            ),
        ],
        writes_member: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Row {
        parent: String,
        position: i64,
    }

    /// In-memory model of one ordered collection table
    fn rows(counts: &[(&str, i64)]) -> Vec<Row> {
        counts
            .iter()
            .flat_map(|(parent, n)| {
                (0..*n).map(move |position| Row {
                    parent: parent.to_string(),
                    position,
                })
            })
            .collect()
    }

    fn move_row(rows: &mut [Row], mover: usize, dest: &str, requested: i64) -> Reconciliation {
        let old_parent = rows[mover].parent.clone();
        let same = old_parent == dest;
        let mut dest_count = rows.iter().filter(|r| r.parent == dest).count() as i64;
        if same {
            dest_count -= 1;
        }

        let rec = reconcile(&ReconcileInput {
            old_parent_id: &old_parent,
            old_position: rows[mover].position,
            dest_parent_id: dest,
            requested_index: requested,
            dest_count,
        });

        for shift in &rec.shifts {
            for row in rows.iter_mut() {
                if row.parent == shift.parent_id && shift.range.contains(row.position) {
                    row.position += shift.delta.amount();
                }
            }
        }
        if rec.writes_member {
            rows[mover].parent = dest.to_string();
            rows[mover].position = rec.final_index;
        }
        rec
    }

    /// Row indices of `parent` in position order
    fn order(rows: &[Row], parent: &str) -> Vec<usize> {
        let mut ids: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].parent == parent).collect();
        ids.sort_by_key(|&i| rows[i].position);
        ids
    }

    fn is_dense(rows: &[Row], parent: &str) -> bool {
        let mut positions: Vec<i64> = rows
            .iter()
            .filter(|r| r.parent == parent)
            .map(|r| r.position)
            .collect();
        positions.sort_unstable();
        positions.iter().enumerate().all(|(i, &p)| p == i as i64)
    }

    #[test]
    fn test_clamp_negative_to_zero() {
        assert_eq!(clamp_index(-5, 3), 0);
        assert_eq!(clamp_index(-1, 0), 0);
    }

    #[test]
    fn test_clamp_same_parent_to_last_slot() {
        // four members, three others: last slot is 3
        assert_eq!(clamp_index(99, 3), 3);
        // only member in its parent
        assert_eq!(clamp_index(4, 0), 0);
    }

    #[test]
    fn test_clamp_cross_parent_allows_append() {
        assert_eq!(clamp_index(99, 2), 2);
        assert_eq!(clamp_index(1, 2), 1);
        assert_eq!(clamp_index(3, 0), 0);
    }

    #[test]
    fn test_same_index_is_noop() {
        let rec = reconcile(&ReconcileInput {
            old_parent_id: "a",
            old_position: 2,
            dest_parent_id: "a",
            requested_index: 2,
            dest_count: 3,
        });
        assert!(rec.is_noop());
        assert_eq!(rec.final_index, 2);
    }

    #[test]
    fn test_moving_earlier_increments_half_open_range() {
        let rec = reconcile(&ReconcileInput {
            old_parent_id: "a",
            old_position: 3,
            dest_parent_id: "a",
            requested_index: 1,
            dest_count: 3,
        });
        assert_eq!(
            rec.shifts,
            vec![PositionShift::new(
                "a",
                PositionRange::Between { start: 1, end: 2 },
                Delta::Increment
            )]
        );
        assert_eq!(rec.final_index, 1);
        assert!(rec.writes_member);
    }

    #[test]
    fn test_moving_later_decrements_half_open_range() {
        let rec = reconcile(&ReconcileInput {
            old_parent_id: "a",
            old_position: 0,
            dest_parent_id: "a",
            requested_index: 2,
            dest_count: 3,
        });
        assert_eq!(
            rec.shifts,
            vec![PositionShift::new(
                "a",
                PositionRange::Between { start: 1, end: 2 },
                Delta::Decrement
            )]
        );
    }

    #[test]
    fn test_cross_parent_closes_source_before_opening_destination() {
        let rec = reconcile(&ReconcileInput {
            old_parent_id: "a",
            old_position: 0,
            dest_parent_id: "b",
            requested_index: 1,
            dest_count: 1,
        });
        assert_eq!(rec.final_index, 1);
        assert_eq!(
            rec.shifts,
            vec![
                PositionShift::new("a", PositionRange::After(0), Delta::Decrement),
                PositionShift::new("b", PositionRange::From(1), Delta::Increment),
            ]
        );
    }

    #[test]
    fn test_move_last_to_index_one() {
        let mut table = rows(&[("a", 4)]);
        move_row(&mut table, 3, "a", 1);
        assert_eq!(order(&table, "a"), vec![0, 3, 1, 2]);
        assert!(is_dense(&table, "a"));
    }

    #[test]
    fn test_move_into_other_parent_at_end() {
        let mut table = rows(&[("a", 2), ("b", 1)]);
        move_row(&mut table, 0, "b", 1);

        assert_eq!(order(&table, "a"), vec![1]);
        assert_eq!(table[1].position, 0);
        assert_eq!(order(&table, "b"), vec![2, 0]);
        assert_eq!(table[0].position, 1);
    }

    #[test]
    fn test_far_index_clamps_to_append() {
        let mut table = rows(&[("a", 1), ("b", 2)]);
        let rec = move_row(&mut table, 0, "b", 99);
        assert_eq!(rec.final_index, 2);
        assert_eq!(order(&table, "b"), vec![1, 2, 0]);
    }

    #[test]
    fn test_move_to_own_last_slot() {
        let mut table = rows(&[("a", 4)]);
        let rec = move_row(&mut table, 0, "a", 99);
        assert_eq!(rec.final_index, 3);
        assert_eq!(order(&table, "a"), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_move_into_empty_parent() {
        let mut table = rows(&[("a", 3)]);
        let rec = move_row(&mut table, 1, "b", 5);
        assert_eq!(rec.final_index, 0);
        assert_eq!(order(&table, "a"), vec![0, 2]);
        assert_eq!(order(&table, "b"), vec![1]);
    }

    const PARENTS: [&str; 3] = ["a", "b", "c"];

    proptest! {
        #[test]
        fn prop_positions_stay_dense(
            counts in proptest::collection::vec(0i64..6, 3),
            moves in proptest::collection::vec((0usize..64, 0usize..3, -3i64..10), 1..24),
        ) {
            let layout: Vec<(&str, i64)> = PARENTS.iter().copied().zip(counts.iter().copied()).collect();
            let mut table = rows(&layout);
            prop_assume!(!table.is_empty());

            for (pick, dest, requested) in moves {
                let mover = pick % table.len();
                let source = table[mover].parent.clone();
                let source_len = order(&table, &source).len();
                let dest_len = order(&table, PARENTS[dest]).len();

                let rec = move_row(&mut table, mover, PARENTS[dest], requested);

                for parent in PARENTS {
                    prop_assert!(is_dense(&table, parent), "parent {} not dense", parent);
                }
                prop_assert_eq!(table[mover].parent.as_str(), PARENTS[dest]);
                prop_assert_eq!(table[mover].position, rec.final_index);
                if source != PARENTS[dest] {
                    prop_assert_eq!(order(&table, &source).len(), source_len - 1);
                    prop_assert_eq!(order(&table, PARENTS[dest]).len(), dest_len + 1);
                }
            }
        }

        #[test]
        fn prop_move_to_own_index_changes_nothing(n in 1i64..8, pick in 0usize..8) {
            let mut table = rows(&[("a", n)]);
            let mover = pick % table.len();
            let before = order(&table, "a");
            let own_index = table[mover].position;
            let rec = move_row(&mut table, mover, "a", own_index);
            prop_assert!(rec.is_noop());
            prop_assert_eq!(order(&table, "a"), before);
        }

        #[test]
        fn prop_move_and_back_restores_order(n in 1i64..8, pick in 0usize..8, target in 0i64..8) {
            let mut table = rows(&[("a", n)]);
            let mover = pick % table.len();
            let original_index = table[mover].position;
            let before = order(&table, "a");

            move_row(&mut table, mover, "a", target);
            move_row(&mut table, mover, "a", original_index);

            prop_assert_eq!(order(&table, "a"), before);
        }

        #[test]
        fn prop_cross_parent_preserves_relative_order(
            a in 1i64..6, b in 0i64..6, pick in 0usize..6, requested in 0i64..8,
        ) {
            let mut table = rows(&[("a", a), ("b", b)]);
            let mover = pick % a as usize;
            let a_before: Vec<usize> = order(&table, "a").into_iter().filter(|&i| i != mover).collect();
            let b_before = order(&table, "b");

            move_row(&mut table, mover, "b", requested);

            prop_assert_eq!(order(&table, "a"), a_before);
            let b_after: Vec<usize> = order(&table, "b").into_iter().filter(|&i| i != mover).collect();
            prop_assert_eq!(b_after, b_before);
        }
    }
}
