//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! route table file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → Router::from_config (build, prune)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and builds a new router
//!     → sent to the owner of the RouterHandle
//!     → atomic swap, in-flight lookups keep the old table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a full rebuild
//! - All sections have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_router, ConfigError};
pub use schema::{BuildConfig, ObservabilityConfig, RouteConfig, RouterConfig};
