//! Trie-based HTTP route matching.
//!
//! Routes are (method, path pattern, version) triples bound to ordered
//! chains of opaque handler values. Resolving a request yields global
//! middleware followed by the matched chain, plus captured path parameters.
//!
//! ```
//! use trie_router::{Method, Router};
//!
//! let mut router = Router::new();
//! router.use_middleware(["log"]);
//! router.get("/users/{id}", ["load_user", "show_user"]).unwrap();
//! router.get("/files/{path*}", ["serve"]).unwrap();
//!
//! let resolved = router.handle(Method::Get, "/Users/42").unwrap();
//! assert_eq!(resolved.handler, vec!["log", "load_user", "show_user"]);
//! assert_eq!(resolved.params["id"], "42");
//! ```

pub mod config;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use routing::{
    ErrorKind, Method, Params, Resolved, RouteTree, Router, RouterError, RouterHandle,
    RouterResult, DEFAULT_VERSION,
};
