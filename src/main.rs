//! Route table inspection CLI.
//!
//! Loads a TOML route table, builds the router exactly as a server would,
//! and answers questions about it.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use trie_router::config::watcher::ConfigWatcher;
use trie_router::config::{load_config, RouterConfig};
use trie_router::observability::logging::init_logging;
use trie_router::{Method, Router, RouterHandle, DEFAULT_VERSION};

#[derive(Parser)]
#[command(name = "trie-router")]
#[command(about = "Build and query trie route tables", long_about = None)]
struct Cli {
    /// Route table file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and build the table, print per-version counts
    Check,
    /// Resolve a request to its handler chain and params
    Resolve {
        method: Method,
        url: String,
        #[arg(short, long, default_value = DEFAULT_VERSION)]
        version: String,
    },
    /// List methods registered at an exact path
    Options {
        path: String,
        #[arg(short, long, default_value = DEFAULT_VERSION)]
        version: String,
    },
    /// Dump every node's full path and methods
    Index {
        #[arg(short, long, default_value = DEFAULT_VERSION)]
        version: String,
    },
    /// Rebuild the table whenever the file changes
    Watch,
}

#[derive(Serialize)]
struct VersionSummary<'a> {
    version: &'a str,
    routes: usize,
    nodes: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability);
    let router = Router::from_config(&config)?;

    match cli.command {
        Commands::Check => print_json(&summarize(&router))?,
        Commands::Resolve {
            method,
            url,
            version,
        } => print_json(&router.handle_in(&version, method, &url)?)?,
        Commands::Options { path, version } => print_json(&router.options_in(&version, &path)?)?,
        Commands::Index { version } => print_json(&router.index_in(&version)?)?,
        Commands::Watch => watch(cli.config, config, router).await?,
    }

    Ok(())
}

fn summarize(router: &Router<String>) -> Vec<VersionSummary<'_>> {
    let mut summary: Vec<VersionSummary<'_>> = router
        .versions()
        .filter_map(|version| {
            router.tree(version).map(|tree| VersionSummary {
                version,
                routes: tree.route_count(),
                nodes: tree.len(),
            })
        })
        .collect();
    summary.sort_by(|a, b| a.version.cmp(b.version));
    summary
}

async fn watch(
    path: PathBuf,
    config: RouterConfig,
    router: Router<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = RouterHandle::new(router);
    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _watcher = watcher.run()?;

    tracing::info!(
        path = %path.display(),
        routes = config.routes.len(),
        "Watching route table"
    );

    loop {
        tokio::select! {
            Some(router) = updates.recv() => {
                for entry in summarize(&router) {
                    tracing::info!(
                        version = entry.version,
                        routes = entry.routes,
                        nodes = entry.nodes,
                        "Reloaded"
                    );
                }
                handle.store(router);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
