//! Performance scoring for sessions and decisions
//!
//! Pure functions of completed data - no mutation, no side effects. The
//! constants here (time tiers, the 10-votes-per-option normalization) are
//! tuning knobs for comparing runs, not hard system limits.

use serde::{Deserialize, Serialize};

use crate::session::{Decision, Session, SessionState};

/// Scoring breakdown for a single decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionScore {
    pub decision_id: String,
    /// Step function of consensus time, 0..=1
    pub consensus_speed: f64,
    /// Winner's vote share, with a small bonus for decisive wins
    pub consensus_strength: f64,
    /// Votes cast relative to 10 per option, capped at 1
    pub vote_efficiency: f64,
    /// `0.4*speed + 0.4*strength + 0.2*efficiency`
    pub total_score: f64,
}

/// Scoring breakdown for a completed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScore {
    pub session_id: String,
    pub total_score: i64,
    pub completion_bonus: i64,
    pub efficiency_bonus: i64,
    pub participation_bonus: i64,
    /// Consistency of consensus times, 0..=1
    pub quality_score: f64,
    /// Closeness of the average consensus time to the 30s ideal, 0..=1
    pub speed_score: f64,
    /// Mean winner vote-share across completed decisions, 0..=1
    pub consensus_score: f64,
    /// Carried along for cross-session aggregation
    pub average_consensus_time_ms: u64,
}

/// Calculates performance scores for sessions and decisions
pub struct Scorer;

impl Scorer {
    /// Score a session. Returns `None` unless the session is terminal.
    pub fn session_score(session: &Session) -> Option<SessionScore> {
        if !session.is_complete() {
            return None;
        }

        let completion_bonus = if session.state == SessionState::Completed {
            100
        } else {
            0
        };

        let avg_seconds = session.metrics.average_consensus_time_ms as f64 / 1000.0;
        let efficiency_bonus = if session.metrics.average_consensus_time_ms == 0 {
            0
        } else if avg_seconds < 10.0 {
            50
        } else if avg_seconds < 30.0 {
            30
        } else if avg_seconds < 60.0 {
            15
        } else {
            0
        };

        let participation_bonus = 2 * session.metrics.total_votes as i64;

        let quality_score = Self::quality_score(session);
        let speed_score = Self::speed_score(session);
        let consensus_score = Self::consensus_score(session);

        let total_score = 10 * i64::from(session.metrics.total_decisions)
            + completion_bonus
            + efficiency_bonus
            + participation_bonus
            + quality_score.trunc() as i64
            + speed_score.trunc() as i64
            + consensus_score.trunc() as i64;

        Some(SessionScore {
            session_id: session.id.clone(),
            total_score,
            completion_bonus,
            efficiency_bonus,
            participation_bonus,
            quality_score,
            speed_score,
            consensus_score,
            average_consensus_time_ms: session.metrics.average_consensus_time_ms,
        })
    }

    /// Score a single decision against the session's K threshold.
    ///
    /// A decision that never completed scores zero across the board.
    pub fn decision_score(decision: &Decision, k: u32) -> DecisionScore {
        let mut score = DecisionScore {
            decision_id: decision.id.clone(),
            consensus_speed: 0.0,
            consensus_strength: 0.0,
            vote_efficiency: 0.0,
            total_score: 0.0,
        };

        let Some(consensus_time) = decision.consensus_time() else {
            return score;
        };

        score.consensus_speed = Self::time_score(consensus_time.num_milliseconds() as f64 / 1000.0);

        if let Some(winner) = &decision.winner {
            let winner_votes = decision.votes.get(winner).copied().unwrap_or(0);
            let total_votes = decision.total_votes();
            let max_other = decision
                .votes
                .iter()
                .filter(|(option, _)| *option != winner)
                .map(|(_, &count)| count)
                .max()
                .unwrap_or(0);

            if total_votes > 0 {
                score.consensus_strength = f64::from(winner_votes) / total_votes as f64;

                // Small bonus for wins more decisive than the rule required
                if winner_votes.saturating_sub(max_other) > k {
                    score.consensus_strength += 0.1;
                }
            }
        }

        let possible = 10 * decision.options.len() as u64;
        if possible > 0 {
            score.vote_efficiency = (decision.total_votes() as f64 / possible as f64).min(1.0);
        }

        score.total_score = 0.4 * score.consensus_speed
            + 0.4 * score.consensus_strength
            + 0.2 * score.vote_efficiency;

        score
    }

    /// Consistency of consensus times: 1 minus the normalized standard
    /// deviation (against a 60s spread). Neutral 0.5 with fewer than two
    /// completed decisions.
    fn quality_score(session: &Session) -> f64 {
        if session.metrics.total_decisions == 0 {
            return 0.0;
        }

        let times: Vec<f64> = session
            .decisions
            .iter()
            .filter_map(|d| d.consensus_time())
            .map(|t| t.num_milliseconds() as f64 / 1000.0)
            .collect();

        if times.len() < 2 {
            return 0.5;
        }

        let mean = times.iter().sum::<f64>() / times.len() as f64;
        let variance =
            times.iter().map(|t| (t - mean) * (t - mean)).sum::<f64>() / times.len() as f64;
        let std_dev = variance.sqrt();

        (1.0 - std_dev / 60.0).clamp(0.0, 1.0)
    }

    /// Closeness of the average consensus time to a 30 second ideal.
    fn speed_score(session: &Session) -> f64 {
        if session.metrics.average_consensus_time_ms == 0 {
            return 0.0;
        }

        let avg_seconds = session.metrics.average_consensus_time_ms as f64 / 1000.0;
        (1.0 - (avg_seconds - 30.0).abs() / 60.0).clamp(0.0, 1.0)
    }

    /// Mean winner vote-share across completed decisions.
    fn consensus_score(session: &Session) -> f64 {
        let mut total_strength = 0.0;
        let mut completed = 0u32;

        for decision in &session.decisions {
            if let (Some(winner), Some(_)) = (&decision.winner, decision.completed_at) {
                let total_votes = decision.total_votes();
                if total_votes > 0 {
                    let winner_votes = decision.votes.get(winner).copied().unwrap_or(0);
                    total_strength += f64::from(winner_votes) / total_votes as f64;
                    completed += 1;
                }
            }
        }

        if completed == 0 {
            0.0
        } else {
            total_strength / f64::from(completed)
        }
    }

    /// Map consensus seconds to a 0..=1 step score. 5-30 seconds is the
    /// ideal band; instant consensus is suspicious, slow consensus decays.
    fn time_score(seconds: f64) -> f64 {
        if seconds < 5.0 {
            0.7
        } else if seconds <= 30.0 {
            1.0
        } else if seconds <= 60.0 {
            0.8
        } else if seconds <= 120.0 {
            0.5
        } else {
            0.2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::VotingEngine;
    use chrono::Duration;

    fn finished_session() -> Session {
        let mut session = Session::new("s1", "Test", 2, 10).unwrap();
        session
            .start_decision("d1", "pick", vec!["A".into(), "B".into(), "C".into()])
            .unwrap();
        VotingEngine::cast_vote(&mut session, "d1", "a1", "A").unwrap();
        VotingEngine::cast_vote(&mut session, "d1", "a2", "A").unwrap();
        session.end().unwrap();
        session
    }

    #[test]
    fn test_no_score_for_active_session() {
        let session = Session::new("s1", "Test", 2, 10).unwrap();
        assert!(Scorer::session_score(&session).is_none());
    }

    #[test]
    fn test_session_score_breakdown() {
        let session = finished_session();
        let score = Scorer::session_score(&session).unwrap();

        assert_eq!(score.completion_bonus, 100);
        // 2 votes cast
        assert_eq!(score.participation_bonus, 4);
        // Sub-millisecond consensus in tests: average rounds to 0ms,
        // so no efficiency bonus and a zero speed score.
        assert_eq!(score.efficiency_bonus, 0);
        assert_eq!(score.speed_score, 0.0);
        // One completed decision: neutral quality
        assert_eq!(score.quality_score, 0.5);
        // Unanimous winner
        assert!((score.consensus_score - 1.0).abs() < 1e-9);

        // 10*1 + 100 + 0 + 4 + trunc(0.5) + trunc(0.0) + trunc(1.0)
        assert_eq!(score.total_score, 10 + 100 + 4 + 1);
    }

    #[test]
    fn test_decision_score_of_incomplete_decision_is_zero() {
        let mut session = Session::new("s1", "Test", 2, 10).unwrap();
        session
            .start_decision("d1", "pick", vec!["A".into(), "B".into()])
            .unwrap();

        let score = Scorer::decision_score(&session.decisions[0], session.k);
        assert_eq!(score.total_score, 0.0);
        assert_eq!(score.consensus_speed, 0.0);
    }

    #[test]
    fn test_decision_score_strength_and_efficiency() {
        let mut session = Session::new("s1", "Test", 1, 10).unwrap();
        session
            .start_decision("d1", "pick", vec!["A".into(), "B".into()])
            .unwrap();
        // A:2 B:1 -> margin 1 == k, no decisiveness bonus
        VotingEngine::cast_vote(&mut session, "d1", "a1", "A").unwrap();
        VotingEngine::cast_vote(&mut session, "d1", "a2", "B").unwrap();
        VotingEngine::cast_vote(&mut session, "d1", "a3", "A").unwrap();

        let decision = &session.decisions[0];
        assert_eq!(decision.winner.as_deref(), Some("A"));
        let score = Scorer::decision_score(decision, session.k);

        assert!((score.consensus_strength - 2.0 / 3.0).abs() < 1e-9);
        assert!((score.vote_efficiency - 3.0 / 20.0).abs() < 1e-9);
        // Test runs complete in far under 5 seconds
        assert!((score.consensus_speed - 0.7).abs() < 1e-9);
        assert!(
            (score.total_score - (0.4 * 0.7 + 0.4 * (2.0 / 3.0) + 0.2 * 0.15)).abs() < 1e-9
        );
    }

    #[test]
    fn test_decisive_win_gets_strength_bonus() {
        use crate::session::Decision;
        use chrono::Utc;

        let mut decision =
            Decision::new("d1", "s1", "pick", 1, vec!["A".into(), "B".into()]).unwrap();
        for _ in 0..4 {
            decision.add_vote("A").unwrap();
        }
        decision.add_vote("B").unwrap();
        decision.complete("A".to_string(), Utc::now());

        // A:4 B:1, margin 3 > k=1 -> +0.1 on top of the 0.8 share
        let score = Scorer::decision_score(&decision, 1);
        assert!((score.consensus_strength - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_time_score_tiers() {
        assert_eq!(Scorer::time_score(2.0), 0.7);
        assert_eq!(Scorer::time_score(15.0), 1.0);
        assert_eq!(Scorer::time_score(45.0), 0.8);
        assert_eq!(Scorer::time_score(90.0), 0.5);
        assert_eq!(Scorer::time_score(500.0), 0.2);
    }

    #[test]
    fn test_quality_score_penalizes_inconsistency() {
        let mut session = finished_session();
        // Fake a second completed decision with a very different duration
        let mut slow = session.decisions[0].clone();
        slow.id = "d2".to_string();
        slow.completed_at = Some(slow.voting_started + Duration::seconds(120));
        session.decisions.push(slow);

        let quality = Scorer::quality_score(&session);
        assert!(quality < 0.5, "expected degraded quality, got {quality}");
    }
}
