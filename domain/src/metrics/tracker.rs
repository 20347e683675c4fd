//! Cross-session metrics tracker
//!
//! An explicit, constructed aggregate (no ambient global state): created at
//! process start, mutated only through its own synchronized methods.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::session::Session;

use super::scoring::{DecisionScore, SessionScore};

/// Global statistics across all recorded sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_sessions: u32,
    pub total_decisions: u32,
    /// Running mean of session total scores
    pub average_session_score: f64,
    /// Mean of the recorded sessions' average consensus times (sessions
    /// that never reached consensus are excluded)
    pub average_consensus_time_ms: u64,
    pub best_session_score: i64,
    /// First-seen wins ties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_session_id: Option<String>,
}

#[derive(Default)]
struct TrackerInner {
    session_scores: HashMap<String, SessionScore>,
    decision_scores: HashMap<String, DecisionScore>,
    stats: GlobalStats,
}

/// Tracks and aggregates scores across sessions
pub struct Tracker {
    inner: RwLock<TrackerInner>,
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TrackerInner::default()),
        }
    }

    /// Record the score of a completed session and fold it into the
    /// global statistics.
    pub fn record_session(&self, session: &Session, score: SessionScore) {
        let mut inner = self.inner.write().expect("tracker lock poisoned");

        inner
            .session_scores
            .insert(session.id.clone(), score.clone());

        inner.stats.total_sessions = inner.session_scores.len() as u32;
        inner.stats.total_decisions += session.metrics.total_decisions;

        let score_sum: i64 = inner
            .session_scores
            .values()
            .map(|s| s.total_score)
            .sum();
        inner.stats.average_session_score =
            score_sum as f64 / inner.session_scores.len() as f64;

        // Strict comparison: the first session to reach a score keeps the
        // best slot on ties.
        if score.total_score > inner.stats.best_session_score
            || inner.stats.best_session_id.is_none()
        {
            inner.stats.best_session_score = score.total_score;
            inner.stats.best_session_id = Some(session.id.clone());
        }

        let with_time: Vec<u64> = inner
            .session_scores
            .values()
            .map(|s| s.average_consensus_time_ms)
            .filter(|&ms| ms > 0)
            .collect();
        inner.stats.average_consensus_time_ms = if with_time.is_empty() {
            0
        } else {
            with_time.iter().sum::<u64>() / with_time.len() as u64
        };
    }

    /// Record the score of a completed decision.
    pub fn record_decision(&self, decision_id: impl Into<String>, score: DecisionScore) {
        let mut inner = self.inner.write().expect("tracker lock poisoned");
        inner.decision_scores.insert(decision_id.into(), score);
    }

    pub fn session_score(&self, session_id: &str) -> Option<SessionScore> {
        let inner = self.inner.read().expect("tracker lock poisoned");
        inner.session_scores.get(session_id).cloned()
    }

    pub fn decision_score(&self, decision_id: &str) -> Option<DecisionScore> {
        let inner = self.inner.read().expect("tracker lock poisoned");
        inner.decision_scores.get(decision_id).cloned()
    }

    /// Snapshot of the global statistics.
    pub fn global_stats(&self) -> GlobalStats {
        let inner = self.inner.read().expect("tracker lock poisoned");
        inner.stats.clone()
    }

    /// Recorded sessions ranked by total score, descending, optionally
    /// capped to the top `limit`.
    pub fn top_sessions(&self, limit: Option<usize>) -> Vec<SessionScore> {
        let inner = self.inner.read().expect("tracker lock poisoned");

        let mut scores: Vec<SessionScore> = inner.session_scores.values().cloned().collect();
        scores.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        if let Some(limit) = limit {
            scores.truncate(limit);
        }
        scores
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Scorer;
    use crate::voting::VotingEngine;

    fn finished_session(id: &str, winning_votes: u32) -> Session {
        let mut session = Session::new(id, "Test", 1, 10).unwrap();
        session
            .start_decision("d1", "pick", vec!["A".into(), "B".into()])
            .unwrap();
        for i in 0..winning_votes {
            VotingEngine::cast_vote(&mut session, "d1", &format!("agent{i}"), "A").unwrap();
        }
        session.end().unwrap();
        session
    }

    #[test]
    fn test_record_updates_global_stats() {
        let tracker = Tracker::new();
        let session = finished_session("s1", 1);
        let score = Scorer::session_score(&session).unwrap();
        let expected = score.total_score;

        tracker.record_session(&session, score);

        let stats = tracker.global_stats();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_decisions, 1);
        assert_eq!(stats.best_session_id.as_deref(), Some("s1"));
        assert_eq!(stats.best_session_score, expected);
        assert!((stats.average_session_score - expected as f64).abs() < 1e-9);
    }

    #[test]
    fn test_best_session_keeps_first_on_tie() {
        let tracker = Tracker::new();

        let first = finished_session("first", 1);
        let second = finished_session("second", 1);
        let score_a = Scorer::session_score(&first).unwrap();
        let score_b = Scorer::session_score(&second).unwrap();
        assert_eq!(score_a.total_score, score_b.total_score);

        tracker.record_session(&first, score_a);
        tracker.record_session(&second, score_b);

        assert_eq!(
            tracker.global_stats().best_session_id.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_top_sessions_ranked_descending() {
        let tracker = Tracker::new();

        // More winning votes -> bigger participation bonus -> higher score
        for (id, votes) in [("low", 1), ("high", 5), ("mid", 3)] {
            let session = finished_session(id, votes);
            let score = Scorer::session_score(&session).unwrap();
            tracker.record_session(&session, score);
        }

        let ranked = tracker.top_sessions(None);
        let ids: Vec<&str> = ranked.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);

        let top_two = tracker.top_sessions(Some(2));
        assert_eq!(top_two.len(), 2);
        assert_eq!(top_two[0].session_id, "high");
    }

    #[test]
    fn test_decision_scores_are_retrievable() {
        let tracker = Tracker::new();
        let session = finished_session("s1", 1);
        let score = Scorer::decision_score(&session.decisions[0], session.k);

        tracker.record_decision("d1", score);
        assert!(tracker.decision_score("d1").is_some());
        assert!(tracker.decision_score("d2").is_none());
    }
}
