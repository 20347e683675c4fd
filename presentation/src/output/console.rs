//! Console output formatting for session state and statistics

use colored::Colorize;
use voter_application::{SessionProgress, SessionStatus, SimulationReport};
use voter_domain::{GlobalStats, Session, SessionScore, SessionState, VoteOutcome};

/// Formats voting results and session state for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One-line confirmation after a session is created.
    pub fn session_created(session: &Session) -> String {
        format!(
            "{} session {} (K={}, max {} turns)",
            "Created".green().bold(),
            session.id.cyan(),
            session.k,
            session.max_turns
        )
    }

    /// What a cast vote did: counted, or decided the decision.
    pub fn vote_outcome(option: &str, outcome: &VoteOutcome) -> String {
        match outcome {
            VoteOutcome::Pending => format!("Vote for {} counted", option.cyan()),
            VoteOutcome::Won(winner) => format!(
                "{} {} wins the decision",
                "Consensus!".green().bold(),
                winner.cyan().bold()
            ),
        }
    }

    /// Full status view: session header, current votes, progress bar and,
    /// once the session is terminal, the score breakdown.
    pub fn status(
        status: &SessionStatus,
        progress: &SessionProgress,
        score: Option<&SessionScore>,
    ) -> String {
        let session = &status.session;
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} ({})\n",
            "Session:".cyan().bold(),
            session.name,
            session.id
        ));
        output.push_str(&format!(
            "{} {}   {} K={}   {} {}/{} turns ({}%)\n",
            "State:".cyan().bold(),
            Self::state_label(session.state),
            "Rule:".cyan().bold(),
            session.k,
            "Progress:".cyan().bold(),
            session.current_turn,
            session.max_turns,
            progress.progress_percentage
        ));

        if let Some(decision) = &status.current_decision {
            output.push_str(&format!(
                "\n{} {} (turn {})\n",
                "Current decision:".yellow().bold(),
                decision.description,
                decision.turn_number
            ));
            if let Some(counts) = &status.vote_counts {
                for (option, count) in counts {
                    output.push_str(&format!("  {option:<20} {count}\n"));
                }
            }
        } else if session.state == SessionState::Active {
            output.push_str(&format!("\n{}\n", "No open decision".dimmed()));
        }

        let completed: Vec<_> = progress
            .decisions
            .iter()
            .filter(|d| d.winner.is_some())
            .collect();
        if !completed.is_empty() {
            output.push_str(&format!("\n{}\n", "Completed decisions:".cyan().bold()));
            for d in completed {
                let time = d
                    .consensus_time_ms
                    .map(|ms| format!(" in {:.1}s", ms as f64 / 1000.0))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "  turn {:>2}: {} -> {}{}\n",
                    d.turn_number,
                    d.description,
                    d.winner.as_deref().unwrap_or("-").green(),
                    time
                ));
            }
        }

        if let Some(score) = score {
            output.push('\n');
            output.push_str(&Self::score_breakdown(score));
        }

        output
    }

    /// Score breakdown for a terminal session.
    pub fn score_breakdown(score: &SessionScore) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "Score:".cyan().bold(),
            score.total_score.to_string().green().bold()
        ));
        output.push_str(&format!(
            "  completion bonus    {:>6}\n",
            score.completion_bonus
        ));
        output.push_str(&format!(
            "  efficiency bonus    {:>6}\n",
            score.efficiency_bonus
        ));
        output.push_str(&format!(
            "  participation bonus {:>6}\n",
            score.participation_bonus
        ));
        output.push_str(&format!(
            "  quality {:.2}   speed {:.2}   consensus {:.2}\n",
            score.quality_score, score.speed_score, score.consensus_score
        ));
        output
    }

    /// Tabular listing of all stored sessions.
    pub fn session_list(sessions: &[Session]) -> String {
        if sessions.is_empty() {
            return format!("{}\n", "No sessions found".dimmed());
        }

        let mut output = format!(
            "{:<20} {:<24} {:<10} {:>3} {:>8} {:>10}\n",
            "ID".bold(),
            "NAME".bold(),
            "STATE".bold(),
            "K".bold(),
            "TURNS".bold(),
            "DECISIONS".bold()
        );
        for session in sessions {
            output.push_str(&format!(
                "{:<20} {:<24} {:<10} {:>3} {:>5}/{:<2} {:>10}\n",
                session.id,
                session.name,
                session.state.to_string(),
                session.k,
                session.current_turn,
                session.max_turns,
                session.metrics.total_decisions
            ));
        }
        output
    }

    /// Result of a multi-agent simulation round.
    pub fn simulation(report: &SimulationReport) -> String {
        let mut output = format!(
            "{} {} votes on {}\n",
            "Simulated".cyan().bold(),
            report.votes.len(),
            report.decision_id
        );
        for vote in &report.votes {
            output.push_str(&format!(
                "  {:<10} [{:<9}] -> {}\n",
                vote.agent_id,
                vote.strategy,
                vote.option.cyan()
            ));
        }
        match &report.winner {
            Some(winner) => output.push_str(&format!(
                "{} {} wins the decision\n",
                "Consensus!".green().bold(),
                winner.cyan().bold()
            )),
            None => output.push_str(&format!("{}\n", "No consensus yet".yellow())),
        }
        output
    }

    /// Aggregate statistics view with a ranked session table.
    pub fn stats(stats: &GlobalStats, ranked: &[SessionScore]) -> String {
        let mut output = format!("{}\n", "Global statistics".cyan().bold());
        output.push_str(&format!(
            "  sessions {}   decisions {}   avg score {:.1}\n",
            stats.total_sessions, stats.total_decisions, stats.average_session_score
        ));
        if stats.average_consensus_time_ms > 0 {
            output.push_str(&format!(
                "  avg consensus time {:.1}s\n",
                stats.average_consensus_time_ms as f64 / 1000.0
            ));
        }
        if let Some(best) = &stats.best_session_id {
            output.push_str(&format!(
                "  best session {} ({})\n",
                best.cyan(),
                stats.best_session_score
            ));
        }

        if !ranked.is_empty() {
            output.push_str(&format!("\n{}\n", "Ranking:".cyan().bold()));
            for (rank, score) in ranked.iter().enumerate() {
                output.push_str(&format!(
                    "  {:>2}. {:<20} {:>6}\n",
                    rank + 1,
                    score.session_id,
                    score.total_score
                ));
            }
        }
        output
    }

    fn state_label(state: SessionState) -> String {
        let label = state.to_string();
        match state {
            SessionState::Active => label.green().to_string(),
            SessionState::Paused => label.yellow().to_string(),
            SessionState::Completed => label.blue().to_string(),
            SessionState::Cancelled => label.red().to_string(),
        }
    }
}
