//! CLI command definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text
    Text,
    /// JSON output
    Json,
}

/// CLI arguments for voter
#[derive(Parser, Debug)]
#[command(name = "voter")]
#[command(author, version, about = "First-to-Ahead-by-K voting sessions")]
#[command(long_about = r#"
Voter runs First-to-Ahead-by-K voting sessions: a session holds a sequence
of decisions, and a decision completes as soon as one option leads every
other option by at least K votes.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./voter.toml        Project-level config
3. ~/.config/voter/config.toml   Global config

Example:
  voter create sprint-42 --name "Sprint 42 retro" -k 2
  voter start-decision sprint-42 "Next refactor target" parser codegen vm
  voter vote sprint-42 parser --agent alice
  voter simulate sprint-42 --agents 5
  voter status sprint-42
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding session data files
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new voting session
    Create {
        /// Session identifier
        id: String,

        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,

        /// K-ahead threshold: a decision completes once one option leads
        /// every other by K votes
        #[arg(short, long)]
        k: Option<u32>,

        /// Maximum number of decision turns
        #[arg(long)]
        max_turns: Option<u32>,
    },

    /// Start the next decision in a session
    StartDecision {
        /// Session identifier
        session_id: String,

        /// What is being decided
        description: String,

        /// Options to vote between (at least two)
        #[arg(required = true, num_args = 2..)]
        options: Vec<String>,
    },

    /// Cast a vote on the session's current decision
    Vote {
        /// Session identifier
        session_id: String,

        /// Option to vote for
        option: String,

        /// Identifier of the voting agent
        #[arg(long, default_value = "human")]
        agent: String,
    },

    /// Let a strategy pick and cast a vote
    StrategicVote {
        /// Session identifier
        session_id: String,

        /// Strategy name (random, consensus, optimal)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Identifier of the voting agent
        #[arg(long, default_value = "agent_1")]
        agent: String,
    },

    /// Run multiple strategic agents against the current decision
    Simulate {
        /// Session identifier
        session_id: String,

        /// Number of agents to simulate
        #[arg(short, long)]
        agents: Option<usize>,
    },

    /// End a session, cancelling any open decision
    End {
        /// Session identifier
        session_id: String,
    },

    /// Show a session's state, current votes and progress
    Status {
        /// Session identifier
        session_id: String,
    },

    /// List all stored sessions
    List,

    /// Show aggregate statistics across stored sessions
    Stats {
        /// Show only the N best-scoring sessions
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_start_decision_requires_two_options() {
        let result = Cli::try_parse_from(["voter", "start-decision", "s", "desc", "only-one"]);
        assert!(result.is_err());

        let cli =
            Cli::try_parse_from(["voter", "start-decision", "s", "desc", "A", "B"]).unwrap();
        match cli.command {
            Command::StartDecision { options, .. } => assert_eq!(options, vec!["A", "B"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_vote_defaults_agent() {
        let cli = Cli::try_parse_from(["voter", "vote", "s", "A"]).unwrap();
        match cli.command {
            Command::Vote { agent, option, .. } => {
                assert_eq!(agent, "human");
                assert_eq!(option, "A");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["voter", "status", "s", "--output", "json", "-vv"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }
}
