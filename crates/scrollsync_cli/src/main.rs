//! Scrollsync CLI
//!
//! Replays scripted scroll scenarios against the headless platform and
//! prints the events and scrollbar geometry they produce:
//! - `run`: replay a scenario file
//! - `init`: write a starter scenario

mod runner;
mod scenario;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::runner::Runner;
use crate::scenario::Scenario;

/// Scripted replay for synchronized custom scrollbars
#[derive(Parser, Debug)]
#[command(name = "scrollsync")]
#[command(about = "Replay scroll scenarios against a headless surface")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scenario file
    Run {
        /// Scenario to replay
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write an example scenario
    Init {
        #[arg(default_value = "scenario.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { scenario, json } => {
            let parsed = Scenario::load(&scenario)?;
            tracing::info!(
                path = %scenario.display(),
                surfaces = parsed.surfaces.len(),
                steps = parsed.steps.len(),
                "replaying scenario"
            );

            let report = Runner::new(&parsed).run(&parsed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", runner::render_text(&report));
            }
        }
        Commands::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            fs::write(&path, scenario::EXAMPLE)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
