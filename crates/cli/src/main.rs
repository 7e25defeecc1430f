//! Athena CLI - console front end for the voice assistant
//!
//! Runs the assistant's listen loop over the terminal and exposes the
//! classifier and router as one-shot commands for inspection.

mod apps;
mod audio;
mod commands;
mod config;
mod console;
mod output;
mod power;
mod web;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::RuntimeOptions;

/// Athena - desktop voice assistant
#[derive(Parser)]
#[command(name = "athena")]
#[command(author = "Athena Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Desktop voice assistant: intent classification and command routing")]
#[command(long_about = r#"
Athena turns spoken (here: typed) requests into actions: volume, timers and
alarms, applications, date and time, web answers.

Examples:
  athena                                  # Interactive session
  athena classify "turn the sound up"     # Print the classification as JSON
  athena classify --explain --table "and its population"
  athena route "set a timer for 5 minutes"
  athena config
"#)]
struct Cli {
    /// Configuration file (defaults to ./athena.toml, then ~/.athena/athena.toml)
    #[arg(short, long, env = "ATHENA_CONFIG")]
    config: Option<PathBuf>,

    /// Allow shutdown, restart and sleep commands to reach the system
    #[arg(long)]
    allow_power: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session over the terminal
    Listen,

    /// Classify an utterance
    Classify {
        /// What the user said
        text: String,

        /// Include per-category scores
        #[arg(short, long)]
        explain: bool,

        /// Print a table instead of JSON
        #[arg(short, long)]
        table: bool,
    },

    /// Classify an utterance and carry out the command
    Route {
        /// What the user said
        text: String,
    },

    /// List registered command categories
    Categories,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("athena={},athena_cli={},warn", log_level, log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let (config, source) = config::load(cli.config.as_deref())?;
    let options = RuntimeOptions {
        allow_power: cli.allow_power,
    };

    match cli.command {
        Some(Commands::Classify {
            text,
            explain,
            table,
        }) => {
            commands::classify(&config, &text, explain, table)?;
        }
        Some(Commands::Route { text }) => {
            commands::route(&config, options, &text).await?;
        }
        Some(Commands::Categories) => {
            commands::list_categories(&config)?;
        }
        Some(Commands::Config) => {
            commands::show_config(&config, source.as_deref())?;
        }
        Some(Commands::Listen) | None => {
            commands::listen(&config, options).await?;
        }
    }

    Ok(())
}
