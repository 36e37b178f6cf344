//! Atomic swapping of whole route tables.
//!
//! The router itself is not synchronised: it is built, then only read. When a
//! table has to change while requests are being served, a new router is built
//! off to the side and published here; readers keep whatever snapshot they
//! loaded until they finish.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::error::RouterResult;
use crate::routing::method::Method;
use crate::routing::router::{Resolved, Router};

/// Shared, swappable handle to a built [`Router`].
#[derive(Debug, Clone)]
pub struct RouterHandle<H> {
    inner: Arc<ArcSwap<Router<H>>>,
}

impl<H: Clone> RouterHandle<H> {
    pub fn new(router: Router<H>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(router)),
        }
    }

    /// The current snapshot.
    pub fn load(&self) -> Arc<Router<H>> {
        self.inner.load_full()
    }

    /// Publishes `router`, returning the snapshot it replaced.
    pub fn store(&self, router: Router<H>) -> Arc<Router<H>> {
        let previous = self.inner.swap(Arc::new(router));
        tracing::info!("Route table swapped");
        previous
    }

    pub fn handle(&self, method: Method, url: &str) -> RouterResult<Resolved<H>> {
        self.inner.load().handle(method, url)
    }

    pub fn handle_in(&self, version: &str, method: Method, url: &str) -> RouterResult<Resolved<H>> {
        self.inner.load().handle_in(version, method, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_replaces_table_for_new_readers() {
        let mut first = Router::new();
        first.get("/old", ["old"]).unwrap();
        let handle = RouterHandle::new(first);
        let held = handle.load();

        let mut second = Router::new();
        second.get("/new", ["new"]).unwrap();
        let previous = handle.store(second);

        assert!(previous.handle(Method::Get, "/old").is_ok());
        assert!(held.handle(Method::Get, "/old").is_ok());
        assert!(handle.handle(Method::Get, "/old").is_err());
        assert_eq!(handle.handle(Method::Get, "/new").unwrap().handler, vec!["new"]);
    }

    #[test]
    fn test_clones_share_the_same_slot() {
        let handle = RouterHandle::new(Router::<&str>::new());
        let reader = handle.clone();

        let mut next = Router::new();
        next.get("/", ["home"]).unwrap();
        handle.store(next);
        assert!(reader.handle_in("DEFAULT", Method::Get, "/").is_ok());
    }

    #[test]
    fn test_readers_on_other_threads() {
        let mut router = Router::new();
        router.get("/users/{id}", ["show"]).unwrap();
        let handle = RouterHandle::new(router);

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let handle = handle.clone();
                std::thread::spawn(move || {
                    let resolved = handle.handle(Method::Get, &format!("/users/{i}")).unwrap();
                    resolved.params["id"].clone()
                })
            })
            .collect();

        let ids: Vec<String> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3"]);
    }
}
