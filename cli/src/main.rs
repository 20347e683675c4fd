//! CLI entrypoint for voter
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voter_application::{
    AdvanceOutcome, SessionProgression, SessionService, StrategicVoting,
};
use voter_domain::{Scorer, Tracker};
use voter_infrastructure::{ConfigLoader, FileConfig, JsonSessionStore};
use voter_presentation::{Cli, Command, ConsoleFormatter, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.effective_data_dir());
    info!(data_dir = %data_dir.display(), "Opening session store");

    // === Dependency Injection ===
    let store = Arc::new(JsonSessionStore::new(data_dir)?);
    let service = Arc::new(SessionService::new(store));
    let progression = SessionProgression::new(Arc::clone(&service));
    let strategic = StrategicVoting::new(Arc::clone(&service));

    run_command(&cli, &config, &service, &progression, &strategic).await
}

async fn run_command(
    cli: &Cli,
    config: &FileConfig,
    service: &Arc<SessionService<JsonSessionStore>>,
    progression: &SessionProgression<JsonSessionStore>,
    strategic: &StrategicVoting<JsonSessionStore>,
) -> Result<()> {
    match &cli.command {
        Command::Create {
            id,
            name,
            k,
            max_turns,
        } => {
            let name = name.as_deref().unwrap_or(id);
            let k = k.unwrap_or(config.session.default_k);
            let max_turns = max_turns.unwrap_or(config.session.default_max_turns);

            let session = service.create_session(id, name, k, max_turns).await?;
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session)?),
                OutputFormat::Text => println!("{}", ConsoleFormatter::session_created(&session)),
            }
        }

        Command::StartDecision {
            session_id,
            description,
            options,
        } => {
            let outcome = progression
                .advance(session_id, description, options.clone())
                .await?;
            match outcome {
                AdvanceOutcome::DecisionStarted(decision) => match cli.output {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&decision)?)
                    }
                    OutputFormat::Text => println!(
                        "Started decision {} (turn {}): {}",
                        decision.id, decision.turn_number, decision.description
                    ),
                },
                AdvanceOutcome::SessionEnded(session) => match cli.output {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&session)?)
                    }
                    OutputFormat::Text => {
                        println!("Session {} reached its turn limit and ended", session.id)
                    }
                },
            }
        }

        Command::Vote {
            session_id,
            option,
            agent,
        } => {
            let status = service.get_status(session_id).await?;
            let Some(decision) = status.current_decision else {
                bail!("Session {session_id} has no open decision");
            };

            let outcome = service
                .cast_vote(session_id, &decision.id, agent, option)
                .await?;
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                OutputFormat::Text => {
                    println!("{}", ConsoleFormatter::vote_outcome(option, &outcome))
                }
            }
        }

        Command::StrategicVote {
            session_id,
            strategy,
            agent,
        } => {
            let strategy = strategy
                .as_deref()
                .unwrap_or(&config.simulation.default_strategy);
            let (vote, outcome) = strategic
                .cast_strategic_vote(session_id, agent, strategy)
                .await?;
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&vote)?),
                OutputFormat::Text => {
                    println!(
                        "{} picked {}",
                        vote.strategy,
                        ConsoleFormatter::vote_outcome(&vote.option, &outcome)
                    )
                }
            }
        }

        Command::Simulate { session_id, agents } => {
            let agents = agents.unwrap_or(config.simulation.default_agents);
            let report = strategic.simulate_agents(session_id, agents).await?;
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print!("{}", ConsoleFormatter::simulation(&report)),
            }
        }

        Command::End { session_id } => {
            let session = service.end_session(session_id).await?;
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session)?),
                OutputFormat::Text => {
                    println!("Session {} ended", session.id);
                    if let Some(score) = Scorer::session_score(&session) {
                        print!("{}", ConsoleFormatter::score_breakdown(&score));
                    }
                }
            }
        }

        Command::Status { session_id } => {
            let status = service.get_status(session_id).await?;
            let progress = progression.progress(session_id).await?;
            let score = Scorer::session_score(&status.session);
            match cli.output {
                OutputFormat::Json => {
                    let view = serde_json::json!({
                        "status": status,
                        "progress": progress,
                        "score": score,
                    });
                    println!("{}", serde_json::to_string_pretty(&view)?);
                }
                OutputFormat::Text => {
                    print!(
                        "{}",
                        ConsoleFormatter::status(&status, &progress, score.as_ref())
                    )
                }
            }
        }

        Command::List => {
            let sessions = service.list_sessions().await?;
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sessions)?),
                OutputFormat::Text => print!("{}", ConsoleFormatter::session_list(&sessions)),
            }
        }

        Command::Stats { top } => {
            let sessions = service.list_sessions().await?;

            let tracker = Tracker::new();
            for session in &sessions {
                if let Some(score) = Scorer::session_score(session) {
                    tracker.record_session(session, score);
                }
                for decision in &session.decisions {
                    if decision.winner.is_some() {
                        tracker
                            .record_decision(&decision.id, Scorer::decision_score(decision, session.k));
                    }
                }
            }

            let stats = tracker.global_stats();
            let ranked = tracker.top_sessions(*top);
            match cli.output {
                OutputFormat::Json => {
                    let view = serde_json::json!({
                        "stats": stats,
                        "ranking": ranked,
                    });
                    println!("{}", serde_json::to_string_pretty(&view)?);
                }
                OutputFormat::Text => print!("{}", ConsoleFormatter::stats(&stats, &ranked)),
            }
        }
    }

    Ok(())
}
