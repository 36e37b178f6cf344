//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Keep one [`RouteTree`] per version label, `DEFAULT` always present
//! - Register handler chains, rejecting duplicates at build time
//! - Resolve (method, url, version) to middleware + route chain and params
//!
//! # Design Decisions
//! - Build-then-serve: all mutation takes `&mut self`, resolution `&self`,
//!   no internal locking (see [`RouterHandle`](crate::routing::RouterHandle)
//!   for swapping whole tables at runtime)
//! - Duplicate detection is per resolved node, so aliases such as
//!   `/Users/` and `/users` collide
//! - A miss in a named version retries once against `DEFAULT`

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::config::RouterConfig;
use crate::observability::metrics;
use crate::routing::error::{RouterError, RouterResult};
use crate::routing::method::Method;
use crate::routing::tree::RouteTree;
use crate::routing::Params;

/// Version label every router carries and falls back to.
pub const DEFAULT_VERSION: &str = "DEFAULT";

/// Outcome of a successful [`Router::handle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved<H> {
    /// Global middleware followed by the route's chain.
    pub handler: Vec<H>,
    pub params: Params,
    /// Version whose tree produced the match.
    pub version: String,
}

/// Versioned route table.
#[derive(Debug, Clone)]
pub struct Router<H> {
    versions: HashMap<String, RouteTree<H>>,
    middleware: Vec<H>,
}

impl<H: Clone> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> Router<H> {
    pub fn new() -> Self {
        let mut versions = HashMap::new();
        versions.insert(DEFAULT_VERSION.to_string(), RouteTree::new());
        Self {
            versions,
            middleware: Vec::new(),
        }
    }

    /// Appends global middleware; it runs before every route chain.
    pub fn use_middleware(&mut self, middleware: impl IntoIterator<Item = H>) -> &mut Self {
        self.middleware.extend(middleware);
        self
    }

    /// Registers `handlers` for `method` at `path` in the `DEFAULT` version.
    pub fn add(
        &mut self,
        method: Method,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add_to(DEFAULT_VERSION, method, path, handlers)
    }

    /// Registers `handlers` for `method` at `path` in `version`, creating the
    /// version on first use.
    pub fn add_to(
        &mut self,
        version: &str,
        method: Method,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        let tree = self.versions.entry(version.to_string()).or_default();
        let id = tree.add_node(path)?;
        let full_path = tree.full_path(id);
        let Some(node) = tree.node_mut(id) else {
            return Err(RouterError::NodeNotFound {
                path: full_path,
                version: version.to_string(),
            });
        };

        if node.has_handler(method) {
            let err = RouterError::DuplicateHandler {
                method,
                path: full_path,
                version: version.to_string(),
            };
            tracing::warn!(error = %err, "Rejected route");
            return Err(err);
        }
        node.add_handler(method, handlers);

        tracing::debug!(%method, path = %full_path, version, "Route registered");
        metrics::record_route_registered(method);
        Ok(self)
    }

    pub fn head(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Head, path, handlers)
    }

    pub fn get(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Get, path, handlers)
    }

    pub fn post(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Post, path, handlers)
    }

    pub fn put(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Put, path, handlers)
    }

    pub fn patch(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Patch, path, handlers)
    }

    pub fn delete(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Delete, path, handlers)
    }

    /// Registration scope for a named version.
    ///
    /// ```
    /// use trie_router::Router;
    ///
    /// let mut router: Router<&str> = Router::new();
    /// router.version("v2").get("/users", ["list_v2"]).unwrap();
    /// assert!(router.versions().any(|v| v == "v2"));
    /// ```
    pub fn version<'a>(&'a mut self, version: &'a str) -> VersionScope<'a, H> {
        VersionScope {
            router: self,
            version,
        }
    }

    /// Methods registered at exactly `path` in `DEFAULT`.
    pub fn options(&self, path: &str) -> RouterResult<Vec<Method>> {
        self.options_in(DEFAULT_VERSION, path)
    }

    /// Methods registered at exactly `path` in `version`.
    pub fn options_in(&self, version: &str, path: &str) -> RouterResult<Vec<Method>> {
        let tree = self.tree_or_err(version)?;
        let id = tree.find_node(path).ok_or_else(|| RouterError::NodeNotFound {
            path: path.to_string(),
            version: version.to_string(),
        })?;
        Ok(tree.node(id).map(|node| node.methods()).unwrap_or_default())
    }

    /// Resolves a request against `DEFAULT`.
    pub fn handle(&self, method: Method, url: &str) -> RouterResult<Resolved<H>> {
        self.handle_in(DEFAULT_VERSION, method, url)
    }

    /// Resolves a request against `version`, then `DEFAULT` on a miss.
    pub fn handle_in(&self, version: &str, method: Method, url: &str) -> RouterResult<Resolved<H>> {
        let tree = self.tree_or_err(version)?;

        if let Some(resolved) = self.resolve(tree, version, method, url) {
            metrics::record_resolution("matched");
            return Ok(resolved);
        }

        if version != DEFAULT_VERSION {
            let fallback = self.tree_or_err(DEFAULT_VERSION)?;
            if let Some(resolved) = self.resolve(fallback, DEFAULT_VERSION, method, url) {
                tracing::trace!(%method, url, version, "Resolved via DEFAULT fallback");
                metrics::record_version_fallback();
                metrics::record_resolution("matched");
                return Ok(resolved);
            }
        }

        tracing::debug!(%method, url, version, "No route matched");
        metrics::record_resolution("no_match");
        Err(RouterError::NoHandler {
            method,
            url: url.to_string(),
        })
    }

    fn resolve(
        &self,
        tree: &RouteTree<H>,
        version: &str,
        method: Method,
        url: &str,
    ) -> Option<Resolved<H>> {
        let (id, params) = tree.find(url)?;
        let node = tree.node(id)?;
        if !node.has_handler(method) {
            tracing::trace!(
                %method,
                url,
                version,
                path = %tree.full_path(id),
                "Matched node lacks method"
            );
            return None;
        }
        let mut handler = self.middleware.clone();
        handler.extend_from_slice(node.handlers(method));
        Some(Resolved {
            handler,
            params,
            version: version.to_string(),
        })
    }

    /// Removes the node at `path` in `DEFAULT` with everything below it.
    pub fn remove(&mut self, path: &str) -> bool {
        self.remove_in(DEFAULT_VERSION, path)
    }

    pub fn remove_in(&mut self, version: &str, path: &str) -> bool {
        self.versions
            .get_mut(version)
            .is_some_and(|tree| tree.remove_node(path))
    }

    /// Compacts every version tree. Returns the total number of merges.
    pub fn prune(&mut self) -> usize {
        let merged: usize = self.versions.values_mut().map(RouteTree::prune).sum();
        metrics::record_nodes_merged(merged);
        merged
    }

    /// `full path -> methods` for every node of `version`.
    pub fn index_in(&self, version: &str) -> RouterResult<BTreeMap<String, Vec<Method>>> {
        Ok(self.tree_or_err(version)?.index())
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    pub fn tree(&self, version: &str) -> Option<&RouteTree<H>> {
        self.versions.get(version)
    }

    fn tree_or_err(&self, version: &str) -> RouterResult<&RouteTree<H>> {
        self.versions
            .get(version)
            .ok_or_else(|| RouterError::UnknownVersion(version.to_string()))
    }
}

impl Router<String> {
    /// Builds a router of handler names from a route table.
    ///
    /// The table is expected to have passed
    /// [`validate_config`](crate::config::validation::validate_config).
    pub fn from_config(config: &RouterConfig) -> RouterResult<Self> {
        let mut router = Router::new();
        router.use_middleware(config.middleware.iter().cloned());

        for route in &config.routes {
            router.add_to(
                &route.version,
                route.method,
                &route.path,
                route.handlers.iter().cloned(),
            )?;
        }

        let merged = if config.build.prune { router.prune() } else { 0 };
        tracing::info!(
            routes = config.routes.len(),
            versions = router.versions.len(),
            merged,
            "Route table built"
        );
        Ok(router)
    }
}

/// Registration handle for one version, returned by [`Router::version`].
pub struct VersionScope<'a, H> {
    router: &'a mut Router<H>,
    version: &'a str,
}

impl<'a, H: Clone> VersionScope<'a, H> {
    pub fn add(
        &mut self,
        method: Method,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.router.add_to(self.version, method, path, handlers)?;
        Ok(self)
    }

    pub fn head(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Head, path, handlers)
    }

    pub fn get(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Get, path, handlers)
    }

    pub fn post(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Post, path, handlers)
    }

    pub fn put(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Put, path, handlers)
    }

    pub fn patch(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Patch, path, handlers)
    }

    pub fn delete(
        &mut self,
        path: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterResult<&mut Self> {
        self.add(Method::Delete, path, handlers)
    }
}
