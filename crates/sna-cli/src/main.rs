//! SNA CLI - Command-line interface for the social network analyzer
//!
//! This is the main entry point for users. It provides commands for
//! setting up a project, serving the graph over WebSocket, and running
//! analyses against the stored graph offline.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "sna")]
#[command(author = "SNA Contributors")]
#[command(version)]
#[command(about = "Social network graph analysis", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a project in the given directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Start the JSON-RPC WebSocket server
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Headless mode: bind to 0.0.0.0 for remote access
        #[arg(long)]
        headless: bool,

        /// Snapshot location (defaults to the configured path)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Run one analysis against the stored graph
    Run {
        /// bfs, dfs, dijkstra, degree-centrality, connected-components or welsh-powell
        algorithm: String,

        /// Start vertex for traversals and shortest paths
        #[arg(short, long)]
        start: Option<String>,

        /// Target vertex for shortest paths
        #[arg(short, long)]
        target: Option<String>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,

        /// Snapshot location (defaults to the configured path)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Show graph statistics
    Status {
        /// Snapshot location (defaults to the configured path)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Export the graph with relationship weights to JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = "sna-graph.json")]
        output: PathBuf,

        /// Snapshot location (defaults to the configured path)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Import a snapshot file into the store
    Import {
        /// Snapshot file with nodes and edges
        file: PathBuf,

        /// Snapshot location (defaults to the configured path)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Serve {
            port,
            headless,
            data,
        } => commands::serve(port, headless, data.as_deref()).await,
        Commands::Run {
            algorithm,
            start,
            target,
            json,
            data,
        } => commands::run(&algorithm, start, target, json, data.as_deref()),
        Commands::Status { data } => commands::status(data.as_deref()),
        Commands::Export { output, data } => commands::export(&output, data.as_deref()),
        Commands::Import { file, data } => commands::import(&file, data.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
