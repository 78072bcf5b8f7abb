//! Queue position calculation.
//!
//! Positions are **reverse-indexed**: for a pending list of length `n`, the
//! entry at index 0 (the front of the list) gets position `n` and the entry at
//! index `n - 1` gets position `1`. Callers must not read this as a
//! conventional "1 is next" rank unless their broker pushes at the head and
//! pops from the tail, in which case the two coincide.

use serde::{Deserialize, Serialize};

use crate::error::StatusError;
use crate::id::JobId;

/// 1-based, reverse-indexed position in the pending list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueuePosition(u64);

impl QueuePosition {
    /// Returns `None` for 0, which is never a valid position.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for QueuePosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Position of `job_id` within `pending`, computed as `len - index`.
///
/// Fails with `PositionRace` when the job is not in the list, which happens
/// legitimately when the list changed after a membership check made against
/// an earlier read.
pub fn queue_position(pending: &[JobId], job_id: &JobId) -> Result<QueuePosition, StatusError> {
    let index = pending
        .iter()
        .position(|id| id == job_id)
        .ok_or_else(|| StatusError::PositionRace(job_id.clone()))?;

    Ok(QueuePosition((pending.len() - index) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<JobId> {
        raw.iter().map(|s| JobId::from(*s)).collect()
    }

    #[test]
    fn front_of_list_gets_highest_position() {
        let pending = ids(&["A", "B", "C"]);

        assert_eq!(queue_position(&pending, &JobId::from("A")).unwrap().get(), 3);
        assert_eq!(queue_position(&pending, &JobId::from("B")).unwrap().get(), 2);
        assert_eq!(queue_position(&pending, &JobId::from("C")).unwrap().get(), 1);
    }

    #[test]
    fn missing_job_is_a_position_race() {
        let pending = ids(&["A", "B"]);
        let err = queue_position(&pending, &JobId::from("Z")).unwrap_err();
        assert_eq!(err, StatusError::PositionRace(JobId::from("Z")));
        assert!(err.is_transient());

        assert!(queue_position(&[], &JobId::from("Z")).is_err());
    }

    #[test]
    fn duplicate_ids_use_first_occurrence() {
        let pending = ids(&["A", "B", "A"]);
        assert_eq!(queue_position(&pending, &JobId::from("A")).unwrap().get(), 3);
    }

    #[test]
    fn zero_is_not_a_position() {
        assert!(QueuePosition::new(0).is_none());
        assert_eq!(QueuePosition::new(4).unwrap().get(), 4);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every listed job gets a position within `[1, len]`.
            #[test]
            fn position_is_within_bounds(len in 1usize..200) {
                let pending: Vec<JobId> = (0..len).map(|i| JobId::from(format!("job-{i}"))).collect();

                for id in &pending {
                    let pos = queue_position(&pending, id).unwrap().get();
                    prop_assert!(pos >= 1);
                    prop_assert!(pos as usize <= len);
                }
            }

            /// Property: positions never increase as the index increases.
            #[test]
            fn position_is_non_increasing_with_index(len in 1usize..200) {
                let pending: Vec<JobId> = (0..len).map(|i| JobId::from(format!("job-{i}"))).collect();

                let positions: Vec<u64> = pending
                    .iter()
                    .map(|id| queue_position(&pending, id).unwrap().get())
                    .collect();

                prop_assert_eq!(positions[0], len as u64);
                prop_assert_eq!(positions[len - 1], 1);
                for pair in positions.windows(2) {
                    prop_assert!(pair[0] >= pair[1]);
                }
            }
        }
    }
}
