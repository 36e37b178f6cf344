//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     Router::add(method, path, handlers, version)
//!     → version's RouteTree::add_node (clean, split, attach)
//!     → Node::add_handler (duplicate check per node + method)
//!     → Router::prune (optional compaction)
//!
//! Incoming Request (method, url, version)
//!     → router.rs (version lookup, DEFAULT fallback)
//!     → tree.rs (depth-first descent)
//!     → matcher.rs (per-node compiled segment patterns)
//!     → Return: middleware + route chain and params, or NoHandler
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, read-only while serving
//! - No regex in the hot path; node patterns are precompiled segment lists
//! - Deterministic: children are visited in key order, literals first
//! - Handlers are opaque values, only stored, ordered and cloned out

pub mod error;
pub mod matcher;
pub mod method;
pub mod node;
pub mod path;
pub mod router;
pub mod snapshot;
pub mod tree;

use std::collections::BTreeMap;

pub use error::{ErrorKind, RouterError, RouterResult};
pub use method::{Method, ParseMethodError};
pub use node::{Node, NodeId};
pub use router::{Resolved, Router, VersionScope, DEFAULT_VERSION};
pub use snapshot::RouterHandle;
pub use tree::RouteTree;

/// Path parameters captured by a match, by name.
pub type Params = BTreeMap<String, String>;
