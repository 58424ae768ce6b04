// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pawtap - an unattended quest agent for the PAWS rewards platform.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pawtap_config::{ConfigError, TapperConfig};

/// Pawtap - an unattended quest agent for the PAWS rewards platform.
#[derive(Parser, Debug)]
#[command(name = "pawtap", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run every configured session until interrupted (default).
    Run,
    /// Validate the configuration and list the sessions.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> Result<TapperConfig, Vec<ConfigError>> {
    match path {
        Some(path) => pawtap_config::load_and_validate_path(path),
        None => pawtap_config::load_and_validate(),
    }
}

fn print_sessions(config: &TapperConfig) {
    let identities = config.session_identities();
    println!("pawtap: config is valid, {} session(s)", identities.len());
    for identity in identities {
        let proxy = identity.proxy.as_deref().unwrap_or("none");
        println!("  {:<20} proxy={proxy}", identity.name);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            pawtap_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Check => print_sessions(&config),
        Commands::Run => {
            serve::init_tracing(&config.agent.log_level);
            if let Err(e) = serve::run_agent(config).await {
                eprintln!("pawtap: {e}");
                std::process::exit(1);
            }
        }
    }
}
