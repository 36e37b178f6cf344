//! Route tree vertex.

use std::collections::BTreeMap;

use crate::routing::matcher::{Parameter, PathPattern};
use crate::routing::method::Method;

/// Index of a node inside its [`RouteTree`](crate::routing::tree::RouteTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// A vertex of the route tree.
///
/// Children are owned through the arena and keyed by their path fragment;
/// `parent` is only a back-reference. The compiled pattern is kept in sync
/// with `path` by the tree, which is the only place paths change.
#[derive(Debug, Clone)]
pub struct Node<H> {
    pub(crate) path: String,
    pub(crate) pattern: PathPattern,
    pub(crate) children: BTreeMap<String, NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) handlers: BTreeMap<Method, Vec<H>>,
}

impl<H> Node<H> {
    pub(crate) fn new(path: String, parent: Option<NodeId>) -> Self {
        Self {
            pattern: PathPattern::compile(&path),
            path,
            children: BTreeMap::new(),
            parent,
            handlers: BTreeMap::new(),
        }
    }

    pub(crate) fn set_path(&mut self, path: String) {
        self.pattern = PathPattern::compile(&path);
        self.path = path;
    }

    /// The cleaned fragment this node contributes to its full path.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parameters(&self) -> &[Parameter] {
        self.pattern.parameters()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Appends handlers to the chain for `method`. Duplicates are kept.
    pub fn add_handler(&mut self, method: Method, handlers: impl IntoIterator<Item = H>) {
        self.handlers.entry(method).or_default().extend(handlers);
    }

    pub fn has_handler(&self, method: Method) -> bool {
        self.handlers.contains_key(&method)
    }

    /// True when any method is bound at this exact node.
    pub fn is_endpoint(&self) -> bool {
        !self.handlers.is_empty()
    }

    /// The chain bound to `method`, or an empty slice.
    pub fn handlers(&self, method: Method) -> &[H] {
        self.handlers.get(&method).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Methods bound at this node, in [`Method`] order.
    pub fn methods(&self) -> Vec<Method> {
        self.handlers.keys().copied().collect()
    }

    /// Removes the given handlers from `method`'s chain, or the whole chain
    /// when `handlers` is empty. A chain left empty unbinds the method.
    ///
    /// Returns whether anything was removed.
    pub fn remove_handler(&mut self, method: Method, handlers: &[H]) -> bool
    where
        H: PartialEq,
    {
        if handlers.is_empty() {
            return self.handlers.remove(&method).is_some();
        }
        let Some(chain) = self.handlers.get_mut(&method) else {
            return false;
        };
        let before = chain.len();
        chain.retain(|h| !handlers.contains(h));
        let removed = chain.len() != before;
        if chain.is_empty() {
            self.handlers.remove(&method);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_keep_registration_order() {
        let mut node: Node<&str> = Node::new("users".into(), None);
        node.add_handler(Method::Get, ["auth", "list"]);
        node.add_handler(Method::Get, ["auth"]);
        assert_eq!(node.handlers(Method::Get), &["auth", "list", "auth"]);
        assert!(node.has_handler(Method::Get));
        assert!(node.handlers(Method::Post).is_empty());
    }

    #[test]
    fn test_remove_specific_handlers() {
        let mut node: Node<&str> = Node::new("users".into(), None);
        node.add_handler(Method::Get, ["auth", "list"]);
        assert!(node.remove_handler(Method::Get, &["auth"]));
        assert_eq!(node.handlers(Method::Get), &["list"]);

        assert!(!node.remove_handler(Method::Get, &["missing"]));
        assert!(node.remove_handler(Method::Get, &["list"]));
        assert!(!node.has_handler(Method::Get));
    }

    #[test]
    fn test_remove_whole_method() {
        let mut node: Node<&str> = Node::new("users".into(), None);
        node.add_handler(Method::Get, ["a"]);
        node.add_handler(Method::Delete, ["b"]);
        assert!(node.remove_handler(Method::Get, &[]));
        assert!(!node.remove_handler(Method::Put, &[]));
        assert_eq!(node.methods(), vec![Method::Delete]);
    }

    #[test]
    fn test_set_path_recompiles_pattern() {
        let mut node: Node<()> = Node::new("users".into(), None);
        assert!(node.parameters().is_empty());
        node.set_path("users/{id}".into());
        assert_eq!(node.path(), "users/{id}");
        assert_eq!(node.parameters().len(), 1);
        assert_eq!(node.parameters()[0].name, "id");
    }
}
