// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WIS - webhook image sender.
//!
//! This is the binary entry point: a headless controller that runs the
//! monitoring engine and reports delivery statistics.

mod activity;
mod check;
mod run;
mod shutdown;
mod sound;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wis_config::WisConfig;

/// WIS - watches folders for new images and relays them to webhooks.
#[derive(Parser, Debug)]
#[command(name = "wis", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch the configured folders and send new images until interrupted.
    Run {
        /// Log every scan cycle.
        #[arg(long)]
        debug: bool,
    },
    /// Show delivery statistics.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Number of months in the monthly series (defaults to stats.months).
        #[arg(long)]
        months: Option<usize>,
        #[command(subcommand)]
        action: Option<StatsAction>,
    },
    /// Manage WIS configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum StatsAction {
    /// Delete all recorded deliveries and errors.
    Reset,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Validate the configuration and check folders, webhooks and sound.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            wis_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Run { debug }) => run::run_monitor(config, debug).await,
        Some(Commands::Stats {
            action: Some(StatsAction::Reset),
            ..
        }) => stats::run_reset(&config),
        Some(Commands::Stats { json, months, .. }) => stats::run_stats(&config, json, months),
        Some(Commands::Config {
            action: ConfigAction::Check { plain },
        }) => check::run_check(&config, cli.config.as_deref(), plain).await,
        None => {
            println!("wis: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("wis: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<WisConfig, Vec<wis_config::ConfigError>> {
    match path {
        Some(path) => wis_config::load_and_validate_path(path),
        None => wis_config::load_and_validate(),
    }
}
