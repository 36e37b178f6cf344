//! Compressed prefix tree of route patterns.
//!
//! # Responsibilities
//! - Insert patterns, splitting nodes on partial segment overlap
//! - Structural lookup (`find_node`) and runtime matching (`find`)
//! - Remove subtrees
//! - Post-build compaction (`prune`)
//!
//! # Design Decisions
//! - Nodes live in an arena owned by the tree; children are referenced by
//!   [`NodeId`], the parent link is a plain index, so there is no ownership cycle
//! - Splitting moves the node's children and handlers into a new child with
//!   `mem::take` instead of cloning shared references
//! - A node may not gain a child while it owns a parameter-first child; this
//!   is checked only when a child is attached
//! - Matching tries literal children before the `{...}` child, independent of
//!   key order, so compaction never changes which route a URL reaches

use std::collections::BTreeMap;
use std::mem;

use crate::routing::error::{RouterError, RouterResult};
use crate::routing::matcher::Captures;
use crate::routing::method::Method;
use crate::routing::node::{Node, NodeId};
use crate::routing::path;
use crate::routing::Params;

const ROOT: NodeId = NodeId(0);

/// Arena-backed route tree for a single version.
#[derive(Debug, Clone)]
pub struct RouteTree<H> {
    nodes: Vec<Option<Node<H>>>,
    free: Vec<usize>,
}

impl<H> Default for RouteTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTree<H> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(String::new(), None))],
            free: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<H>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<H>> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// True when the tree holds nothing but an empty root.
    pub fn is_empty(&self) -> bool {
        self.len() == 1 && self.node(ROOT).is_some_and(|root| !root.is_endpoint())
    }

    /// Slash-joined path from the root down to `id`, with a leading slash.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut fragments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };
            if !node.path.is_empty() {
                fragments.push(node.path.as_str());
            }
            cursor = node.parent;
        }
        fragments.reverse();
        format!("/{}", fragments.join("/"))
    }

    /// Inserts `raw` and returns the node that now represents it.
    ///
    /// Inserting an existing path returns the existing node unchanged.
    pub fn add_node(&mut self, raw: &str) -> RouterResult<NodeId> {
        let cleaned = path::clean_path(raw);
        self.insert_at(ROOT, &cleaned)
    }

    fn insert_at(&mut self, id: NodeId, target: &str) -> RouterResult<NodeId> {
        let (current, is_root) = match self.node(id) {
            Some(node) => (node.path.clone(), node.parent.is_none()),
            None => return Err(self.no_common_root(id, target)),
        };
        if current == target {
            return Ok(id);
        }

        let shared = path::common_prefix(&current, target);
        if shared < path::segment_count(&current) {
            if shared == 0 && !is_root {
                return Err(self.no_common_root(id, target));
            }
            self.split(id, shared);
            return self.insert_at(id, target);
        }

        let remainder = path::skip_segments(target, shared);
        if let Some(child) = self.best_child(id, &remainder) {
            return self.insert_at(child, &remainder);
        }
        self.attach(id, remainder)
    }

    /// The child sharing the most leading segments with `remainder`, if any.
    fn best_child(&self, id: NodeId, remainder: &str) -> Option<NodeId> {
        self.node(id)?
            .children
            .iter()
            .map(|(key, child)| (path::common_prefix(key, remainder), *child))
            .filter(|(overlap, _)| *overlap > 0)
            .max_by_key(|(overlap, _)| *overlap)
            .map(|(_, child)| child)
    }

    fn no_common_root(&self, id: NodeId, target: &str) -> RouterError {
        RouterError::NoCommonRoot {
            node: self.full_path(id),
            path: target.to_string(),
        }
    }

    /// Demotes everything below the first `shared` segments of `id` into a
    /// new child, leaving `id` with the shared prefix and no handlers.
    fn split(&mut self, id: NodeId, shared: usize) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let head = path::take_segments(&node.path, shared);
        let tail = path::skip_segments(&node.path, shared);
        let children = mem::take(&mut node.children);
        let handlers = mem::take(&mut node.handlers);

        let mut demoted = Node::new(tail.clone(), Some(id));
        demoted.children = children;
        demoted.handlers = handlers;
        let grandchildren: Vec<NodeId> = demoted.children.values().copied().collect();
        let demoted_id = self.alloc(demoted);
        for child in grandchildren {
            if let Some(node) = self.node_mut(child) {
                node.parent = Some(demoted_id);
            }
        }

        tracing::debug!(
            node = %self.full_path(id),
            head = %head,
            tail = %tail,
            "Splitting route node"
        );
        self.set_path(id, head);
        if let Some(node) = self.node_mut(id) {
            node.children.insert(tail, demoted_id);
        }
    }

    /// Adds a new leaf under `parent`, enforcing the parameter-sibling rule.
    fn attach(&mut self, parent: NodeId, fragment: String) -> RouterResult<NodeId> {
        let existing = self.node(parent).and_then(|node| {
            node.children
                .iter()
                .find(|(_, child)| {
                    self.node(**child)
                        .is_some_and(|c| c.pattern.starts_with_parameter())
                })
                .map(|(key, _)| key.clone())
        });
        if let Some(existing) = existing {
            let err = RouterError::AmbiguousRoute {
                parent: self.full_path(parent),
                existing,
                path: fragment,
            };
            tracing::warn!(error = %err, "Rejected route");
            return Err(err);
        }

        let child = self.alloc(Node::new(fragment.clone(), Some(parent)));
        if let Some(node) = self.node_mut(parent) {
            node.children.insert(fragment, child);
        }
        tracing::debug!(path = %self.full_path(child), "Attached route node");
        Ok(child)
    }

    /// Changes a node's path, keeping the parent's child key in sync.
    fn set_path(&mut self, id: NodeId, new_path: String) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let old_path = mem::take(&mut node.path);
        node.set_path(new_path.clone());
        let parent = node.parent;
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.remove(&old_path);
            parent.children.insert(new_path, id);
        }
    }

    fn alloc(&mut self, node: Node<H>) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Releases every node below `id`, and `id` itself.
    fn release_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children.values().copied());
                self.free.push(current.0);
            }
        }
    }

    /// Exact structural lookup: the node whose full path equals the cleaned
    /// `raw`. Parameter tokens are compared as text, not matched.
    pub fn find_node(&self, raw: &str) -> Option<NodeId> {
        let cleaned = path::clean_path(raw);
        self.locate(ROOT, &cleaned)
    }

    fn locate(&self, id: NodeId, target: &str) -> Option<NodeId> {
        let node = self.node(id)?;
        if node.path == target {
            return Some(id);
        }
        let own = path::segment_count(&node.path);
        if path::common_prefix(&node.path, target) != own {
            return None;
        }
        let rest = path::skip_segments(target, own);
        node.children
            .values()
            .find_map(|child| self.locate(*child, &rest))
    }

    pub fn has_node(&self, raw: &str) -> bool {
        self.find_node(raw).is_some()
    }

    /// Removes the node at `raw` together with its subtree.
    ///
    /// The root is never detached; removing it clears the whole tree.
    pub fn remove_node(&mut self, raw: &str) -> bool {
        let Some(id) = self.find_node(raw) else {
            return false;
        };
        let (parent, key) = match self.node(id) {
            Some(node) => (node.parent, node.path.clone()),
            None => return false,
        };

        match parent {
            Some(parent) => {
                if let Some(node) = self.node_mut(parent) {
                    node.children.remove(&key);
                }
                self.release_subtree(id);
            }
            None => {
                let children: Vec<NodeId> = match self.node_mut(id) {
                    Some(root) => {
                        root.set_path(String::new());
                        root.handlers.clear();
                        mem::take(&mut root.children).into_values().collect()
                    }
                    None => Vec::new(),
                };
                for child in children {
                    self.release_subtree(child);
                }
            }
        }
        tracing::debug!(path = %key, "Removed route node");
        true
    }

    /// Matches a request URL against the tree.
    ///
    /// Returns the first endpoint, in depth-first child order, whose
    /// accumulated pattern consumes the whole URL, together with the captured
    /// parameters. Nodes without handlers never end a match, and a wildcard
    /// gives segments back when nothing below it matches the rest.
    pub fn find(&self, url: &str) -> Option<(NodeId, Params)> {
        let cleaned = path::clean_url(url);
        let segments: Vec<&str> = path::segments(&cleaned).collect();
        let mut captures = Captures::new();
        let id = self.match_from(ROOT, &segments, &mut captures)?;
        Some((id, captures.into_bindings().into_iter().collect()))
    }

    fn match_from(&self, id: NodeId, url: &[&str], captures: &mut Captures) -> Option<NodeId> {
        let node = self.node(id)?;
        node.pattern.match_each(url, captures, &mut |consumed, captures| {
            let rest = &url[consumed..];
            if rest.is_empty() {
                return node.is_endpoint().then_some(id);
            }
            self.match_children(node, rest, captures)
        })
    }

    /// Literal children first, then the (at most one) parameter child.
    fn match_children(
        &self,
        node: &Node<H>,
        rest: &[&str],
        captures: &mut Captures,
    ) -> Option<NodeId> {
        let starts_with_parameter = |child: &NodeId| {
            self.node(*child)
                .is_some_and(|c| c.pattern.starts_with_parameter())
        };
        let literals = node.children.values().filter(|c| !starts_with_parameter(*c));
        let parameters = node.children.values().filter(|c| starts_with_parameter(*c));
        literals
            .chain(parameters)
            .find_map(|child| self.match_from(*child, rest, captures))
    }

    /// Collapses chains of single children, depth-first.
    ///
    /// A node absorbs its only child when the node itself has no handlers:
    /// the paths are joined and the child's children and handlers move up.
    /// Endpoints are never absorbed into a longer path. Running it twice is
    /// the same as running it once. Returns the number of merges.
    pub fn prune(&mut self) -> usize {
        let merged = self.prune_at(ROOT);
        if merged > 0 {
            tracing::debug!(merged, nodes = self.len(), "Pruned route tree");
        }
        merged
    }

    fn prune_at(&mut self, id: NodeId) -> usize {
        let children: Vec<NodeId> = match self.node(id) {
            Some(node) => node.children.values().copied().collect(),
            None => return 0,
        };
        let mut merged: usize = children.into_iter().map(|child| self.prune_at(child)).sum();

        loop {
            let only_child = match self.node(id) {
                Some(node) if node.children.len() == 1 && !node.is_endpoint() => {
                    node.children.values().next().copied()
                }
                _ => None,
            };
            let Some(child) = only_child else {
                break;
            };
            self.merge_child(id, child);
            merged += 1;
        }
        merged
    }

    fn merge_child(&mut self, id: NodeId, child_id: NodeId) {
        let Some(child) = self.nodes.get_mut(child_id.0).and_then(Option::take) else {
            return;
        };
        self.free.push(child_id.0);

        let grandchildren: Vec<NodeId> = child.children.values().copied().collect();
        for grandchild in grandchildren {
            if let Some(node) = self.node_mut(grandchild) {
                node.parent = Some(id);
            }
        }

        let joined = match self.node_mut(id) {
            Some(node) => {
                node.children = child.children;
                node.handlers = child.handlers;
                path::join(&node.path, &child.path)
            }
            None => return,
        };
        self.set_path(id, joined);
    }

    /// Every node's full path mapped to the methods bound there.
    pub fn index(&self) -> BTreeMap<String, Vec<Method>> {
        let mut index = BTreeMap::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node(id) {
                index.insert(self.full_path(id), node.methods());
                stack.extend(node.children.values().copied());
            }
        }
        index
    }

    /// Number of (path, method) bindings in the tree.
    pub fn route_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .map(|node| node.handlers.len())
            .sum()
    }
}
