//! agentdist CLI, the main entry point.
//!
//! Commands:
//! - `init`: write a default config file
//! - `route`: show how a query would be routed
//! - `ask`: answer a query, streaming the reasoning trace
//! - `catalog`: list intents, capability clusters and agents

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "agentdist",
    about = "agentdist: hierarchical agent routing with a ReAct loop",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Read the catalog from a JSON snapshot instead of the registry
    #[arg(long, global = true, env = "AGENTDIST_CATALOG_FILE")]
    catalog_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Show the routing decision for a query
    Route {
        query: String,
    },

    /// Answer a query
    Ask {
        query: String,

        /// JSON file with prior conversation turns
        #[arg(long)]
        history_file: Option<PathBuf>,
    },

    /// List the catalog
    Catalog,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let catalog_file = cli.catalog_file.as_deref();
    match cli.command {
        Commands::Init => commands::init::run()?,
        Commands::Route { query } => commands::route::run(&query, catalog_file).await?,
        Commands::Ask {
            query,
            history_file,
        } => commands::ask::run(&query, history_file.as_deref(), catalog_file).await?,
        Commands::Catalog => commands::catalog::run(catalog_file).await?,
    }

    Ok(())
}
