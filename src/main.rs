//! uttt-engine: an ultimate tic-tac-toe engine.
//!
//! ## Usage
//!
//! - `uttt-engine` - Show a demo
//! - `uttt-engine protocol` - Start the text protocol for a front end
//! - `uttt-engine demo` - Play the engine against a random mover
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use uttt_engine::board::Color;
use uttt_engine::config::EngineConfig;
use uttt_engine::playout::{Mover, play_out};
use uttt_engine::position::Position;
use uttt_engine::protocol::ProtocolEngine;
use uttt_engine::search::Searcher;

/// uttt-engine: an ultimate tic-tac-toe engine
#[derive(Parser)]
#[command(name = "uttt-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search depth (overrides the configuration)
    #[arg(long, global = true)]
    depth: Option<i32>,

    /// Seed for tie-breaking (overrides the configuration)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Minimum milliseconds before a computer move is committed
    #[arg(long, global = true)]
    pacing_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text command protocol for use with a front end
    Protocol,
    /// Play the engine against a random mover and print the result
    Demo,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Protocol) => {
            let mut engine = ProtocolEngine::new(config);
            engine.run().context("protocol I/O failed")?;
        }
        Some(Commands::Demo) | None => run_demo(&config),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(depth) = cli.depth {
        config.search_depth = depth;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(pacing) = cli.pacing_ms {
        config.pacing_ms = pacing;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run_demo(config: &EngineConfig) {
    println!("uttt-engine: Ultimate Tic-Tac-Toe Engine\n");

    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut rng = fastrand::Rng::with_seed(seed);
    let searcher = Searcher::with_seed(config.scoring, seed);
    let mut computer = Mover::engine(searcher, config.search_depth);
    let mut player = Mover::Random;

    println!(
        "Engine (X, depth {}) against random mover (O), seed {seed}...",
        config.search_depth
    );
    let mut pos = Position::with_first_mover(Color::Player);
    let result = play_out(&mut pos, &mut computer, &mut player, &mut rng);

    println!("{pos}");
    match result.winner {
        Some(winner) => println!("{winner} wins after {} moves", result.moves.len()),
        None => println!("no result after {} moves", result.moves.len()),
    }
}
