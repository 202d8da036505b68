// SPDX-FileCopyrightText: 2026 Inlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inlet - social webhook ingestion service.
//!
//! This is the binary entry point for the Inlet server and CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

use inlet_core::InletError;

mod pages;
mod serve;

/// Inlet - social webhook ingestion service.
#[derive(Parser, Debug)]
#[command(name = "inlet", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook gateway server.
    Serve,
    /// Print the effective configuration.
    Config,
    /// List pages the app token administers.
    Pages {
        /// Configured app id to query with.
        #[arg(long)]
        app: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match inlet_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            inlet_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Serve) | None => serve::run(config).await,
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Pages { app }) => pages::run(&config, &app).await,
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "inlet exiting");
        std::process::exit(1);
    }
}

fn print_config(config: &inlet_config::model::InletConfig) -> Result<(), InletError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| InletError::Internal(format!("failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Initializes the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
