//! Property tests for tree construction and compaction.

use proptest::prelude::*;
use trie_router::routing::path::clean_path;
use trie_router::{Method, Params, RouteTree, Router, RouterError};

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-cA-C][a-c0-9]{0,1}",
        1 => "[a-z]{1,4}".prop_map(|name| format!("{{{name}}}")),
        1 => "[a-z]{1,4}".prop_map(|name| format!("{{{name}*}}")),
    ]
}

fn route() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..5).prop_map(|segments| format!("/{}", segments.join("/")))
}

fn build(paths: &[String]) -> RouteTree<u32> {
    let mut tree = RouteTree::new();
    for (i, p) in paths.iter().enumerate() {
        // Ambiguous siblings are rejected; skip those inputs.
        if let Ok(id) = tree.add_node(p) {
            let node = tree.node_mut(id).unwrap();
            if !node.has_handler(Method::Get) {
                node.add_handler(Method::Get, [i as u32]);
            }
        }
    }
    tree
}

/// A request URL for `pattern`: parameters take the next fill value,
/// wildcards take the next two.
fn concrete(pattern: &str, fills: &[String]) -> String {
    let mut fill = fills.iter().cycle();
    let segments: Vec<String> = pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| match (segment.starts_with('{'), segment.ends_with("*}")) {
            (true, true) => format!("{}/{}", fill.next().unwrap(), fill.next().unwrap()),
            (true, false) => fill.next().unwrap().clone(),
            (false, _) => segment.to_string(),
        })
        .collect();
    format!("/{}", segments.join("/"))
}

fn resolve(router: &Router<u32>, url: &str) -> Result<(Vec<u32>, Params), RouterError> {
    router
        .handle(Method::Get, url)
        .map(|resolved| (resolved.handler, resolved.params))
}

proptest! {
    #[test]
    fn prop_inserted_paths_round_trip(paths in prop::collection::vec(route(), 1..12)) {
        let mut tree: RouteTree<()> = RouteTree::new();
        let mut inserted = Vec::new();
        for p in &paths {
            if tree.add_node(p).is_ok() {
                inserted.push(p.clone());
            }
        }
        for p in &inserted {
            let id = tree.find_node(p);
            prop_assert!(id.is_some(), "lost {}", p);
            prop_assert_eq!(tree.full_path(id.unwrap()), format!("/{}", clean_path(p)));
        }
    }

    #[test]
    fn prop_prune_is_idempotent(paths in prop::collection::vec(route(), 1..12)) {
        let mut tree = build(&paths);
        tree.prune();
        let once = tree.index();
        tree.prune();
        prop_assert_eq!(tree.index(), once);
    }

    #[test]
    fn prop_prune_keeps_endpoints(paths in prop::collection::vec(route(), 1..12)) {
        let mut tree = build(&paths);
        let endpoints: Vec<(String, Vec<Method>)> = tree
            .index()
            .into_iter()
            .filter(|(_, methods)| !methods.is_empty())
            .collect();
        tree.prune();
        let index = tree.index();
        for (path, methods) in endpoints {
            prop_assert_eq!(index.get(&path), Some(&methods));
        }
    }

    #[test]
    fn prop_prune_preserves_resolution(
        paths in prop::collection::vec(route(), 1..12),
        removed in prop::collection::vec(any::<prop::sample::Index>(), 0..3),
        fills in prop::collection::vec("[a-c][a-c0-9]{0,1}", 1..4),
    ) {
        let mut router = Router::new();
        for (i, p) in paths.iter().enumerate() {
            // Duplicates and ambiguous siblings are rejected; skip those inputs.
            let _ = router.get(p, [i as u32]);
        }
        for index in &removed {
            router.remove(&paths[index.index(paths.len())]);
        }

        let urls: Vec<String> = paths.iter().map(|p| concrete(p, &fills)).collect();
        let before: Vec<_> = urls.iter().map(|url| resolve(&router, url)).collect();
        router.prune();
        let after: Vec<_> = urls.iter().map(|url| resolve(&router, url)).collect();
        prop_assert_eq!(before, after);
    }
}
