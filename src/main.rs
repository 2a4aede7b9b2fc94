// Copyright 2026 Restmeta Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use restmeta::cli;
use restmeta::config::Config;

#[derive(Parser)]
#[command(
    name = "restmeta",
    about = "Restmeta — compile controller declarations into route validation metadata",
    version,
    after_help = "Run 'restmeta <command> --help' for details on each command."
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, short, global = true, default_value = "restmeta.json")]
    config: PathBuf,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the configured sources and write the metadata artifact
    Generate,
    /// Print the synthesized OpenAPI document
    Openapi,
    /// Show the metadata registered for a method and path
    Lookup {
        /// HTTP method (e.g. "POST")
        method: String,
        /// Request path (e.g. "/api/check-age")
        path: String,
    },
    /// Load the table and expose the schema endpoint over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = run(cli).await;

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_file(&cli.config)?;

    match cli.command {
        Commands::Generate => cli::generate_cmd::run(&config),
        Commands::Openapi => cli::openapi_cmd::run(&config),
        Commands::Lookup { method, path } => cli::lookup_cmd::run(&config, &method, &path),
        Commands::Serve { port } => cli::serve_cmd::run(&config, port).await,
    }
}
