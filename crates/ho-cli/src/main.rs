//! Headless command-line runner for Holdout sessions.

mod commands;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "holdout",
    about = "Holdout: inspect generated stores and run headless survival sessions",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a world and summarize its layout
    Generate {
        /// RNG seed for deterministic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// World width in world units
        #[arg(long, default_value = "2400")]
        width: u32,

        /// World height in world units
        #[arg(long, default_value = "1600")]
        height: u32,

        /// Zombies in the initial wave
        #[arg(short, long, default_value = "5")]
        zombies: usize,

        /// Print the full world as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Write the world as JSON to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a session without a network, optionally driven by a command script
    Simulate {
        /// Number of ticks to simulate (default: 600 = ten seconds at 60 Hz)
        #[arg(short, long, default_value = "600")]
        ticks: u64,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Players to join before the first tick
        #[arg(short, long, default_value = "1")]
        players: usize,

        /// World width in world units
        #[arg(long, default_value = "2400")]
        width: u32,

        /// World height in world units
        #[arg(long, default_value = "1600")]
        height: u32,

        /// Ticks a loot search takes
        #[arg(long, default_value = "60")]
        loot_ticks: u32,

        /// JSON-lines file of `{"tick": n, "player": i, "action": ...}` commands
        #[arg(long)]
        script: Option<PathBuf>,

        /// Show all events (not just summary)
        #[arg(short, long)]
        verbose: bool,

        /// Print the final snapshot as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            seed,
            width,
            height,
            zombies,
            json,
            output,
        } => commands::generate::run(
            &commands::generate::Options {
                seed,
                width,
                height,
                zombies,
                json,
            },
            output.as_deref(),
        ),
        Commands::Simulate {
            ticks,
            seed,
            players,
            width,
            height,
            loot_ticks,
            script,
            verbose,
            json,
        } => commands::simulate::run(&commands::simulate::Options {
            ticks,
            seed,
            players,
            width,
            height,
            loot_ticks,
            script,
            verbose,
            json,
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
