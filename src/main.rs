//! Ranklift - demo harness
//!
//! Loads a rank configuration file, wires the engine to in-memory backends
//! seeded with a demo player, and either prints the configured ladder or
//! simulates rankup attempts. Exists to exercise the loader, engine, and
//! orchestrator end to end outside a real server host.

use clap::{Parser, Subcommand};
use ranklift::backend::memory::{
    MemoryEconomy, MemoryPermissions, MemoryStatistics, RecordingSink,
};
use ranklift::backend::Statistic;
use ranklift::command::RankupCommand;
use ranklift::core::error::Result;
use ranklift::core::types::CommandSource;
use ranklift::engine::ProgressionEngine;
use ranklift::graph::loader::load_rank_config;
use ranklift::requirement::registry::RequirementRegistry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ranklift", about = "Rank progression demo harness")]
struct Cli {
    /// Path to the rank configuration file
    #[arg(long, default_value = "config/ranks.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the configured rank ladder
    Ladder,
    /// Run a rankup attempt for the demo player
    Simulate {
        /// Explicit target rank (optional)
        target: Option<String>,
        /// Demo player's starting rank
        #[arg(long, default_value = "peasant")]
        rank: String,
        /// Demo player's balance
        #[arg(long, default_value_t = 5000.0)]
        balance: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ranklift=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let registry = Arc::new(RequirementRegistry::with_builtins());
    let config = load_rank_config(&cli.config, &registry)?;

    match cli.command {
        Command::Ladder => {
            for edge in config.graph.edges() {
                println!(
                    "{} -> {} ({}), cost {}, requirements: {:?}",
                    edge.from, edge.to, edge.display_name, edge.cost, edge.requirement_strings
                );
            }
        }
        Command::Simulate {
            target,
            rank,
            balance,
        } => {
            let player = "demo";
            let permissions = Arc::new(MemoryPermissions::new());
            let economy = Arc::new(MemoryEconomy::new());
            let stats = Arc::new(MemoryStatistics::new());
            let sink = Arc::new(RecordingSink::new());

            permissions.set_primary_group(player, &rank);
            for edge in config.graph.edges() {
                permissions.define_group(edge.from.as_str());
                permissions.define_group(edge.to.as_str());
            }
            economy.set_balance(player, balance);
            // Seed generous demo statistics so the ladder is walkable
            stats.set_level(player, 50);
            stats.set_statistic(player, Statistic::TimePlayed, None, i64::from(i32::MAX));
            for edge in config.graph.edges() {
                for definition in &edge.requirement_strings {
                    for token in definition.split_whitespace().skip(1) {
                        if token.chars().any(|c| c.is_ascii_alphabetic()) {
                            for stat in [
                                Statistic::BlockBreak,
                                Statistic::BlockPlace,
                                Statistic::ItemUse,
                                Statistic::ItemCraft,
                            ] {
                                stats.set_statistic(player, stat, Some(token), 1_000_000);
                            }
                        }
                    }
                }
            }

            let engine = ProgressionEngine::new(
                Arc::new(config.graph),
                registry,
                permissions,
                economy,
                stats,
                sink.clone(),
                config.settings,
            );

            let command = RankupCommand::new(&engine, sink.as_ref());
            let signal = command.execute(
                &CommandSource::Player(player.to_string()),
                target.as_deref(),
            );

            println!("signal: {signal:?}");
            for (kind, context) in sink.take() {
                println!("notify {kind:?}: {context}");
            }
        }
    }

    Ok(())
}
