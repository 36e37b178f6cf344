//! Route table watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_router, ConfigError};
use crate::observability::metrics;
use crate::routing::Router;

/// Watches a route-table file and publishes freshly built routers.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Router<String>>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for rebuilt routers.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Router<String>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Route table change detected, reloading...");
                        if let Ok(router) = reload(&path) {
                            let _ = tx.send(router);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Route table watcher started");
        Ok(watcher)
    }
}

/// Loads, validates and builds the table at `path`, logging the outcome.
pub fn reload(path: &Path) -> Result<Router<String>, ConfigError> {
    match load_router(path) {
        Ok((_, router)) => {
            metrics::record_reload("ok");
            Ok(router)
        }
        Err(e) => {
            tracing::error!(
                "Failed to reload route table: {}. Keeping current table.",
                e
            );
            metrics::record_reload("error");
            Err(e)
        }
    }
}
