//! First-to-Ahead-by-K winner rule
//!
//! An option wins as soon as its vote count exceeds every other option's
//! count by at least K.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The K-ahead winner rule
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use voter_domain::voting::AheadByK;
///
/// let votes: BTreeMap<String, u32> =
///     [("A".into(), 3), ("B".into(), 1), ("C".into(), 0)].into();
///
/// assert_eq!(AheadByK::new(2).winner(&votes), Some("A".to_string()));
/// assert_eq!(AheadByK::new(3).winner(&votes), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AheadByK(u32);

impl AheadByK {
    pub fn new(k: u32) -> Self {
        Self(k)
    }

    /// The threshold value
    pub fn k(&self) -> u32 {
        self.0
    }

    /// Determine the winner, if any, for the given vote counts.
    ///
    /// The leader is the option with the most votes; when several options
    /// tie for the maximum, the lexicographically smallest label is the
    /// leader (the map's own order, deterministic across runs, unlike a
    /// hash-map traversal). The leader wins iff it is at least K votes
    /// ahead of every other option.
    ///
    /// With zero votes cast the leader sits at 0 and every other option is
    /// within 0 of it, so no winner is possible while K >= 1.
    pub fn winner(&self, votes: &BTreeMap<String, u32>) -> Option<String> {
        if votes.is_empty() {
            return None;
        }

        let (leader, max_votes) = votes
            .iter()
            .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))?;

        let ahead_of_all = votes
            .iter()
            .filter(|(label, _)| *label != leader)
            .all(|(_, &count)| max_votes - count >= self.0);

        if ahead_of_all {
            Some(leader.clone())
        } else {
            None
        }
    }
}

impl std::fmt::Display for AheadByK {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "first-to-ahead-by-{}", self.0)
    }
}
