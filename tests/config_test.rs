//! Route tables loaded from disk.

use trie_router::config::{load_config, load_router, ConfigError};
use trie_router::{Method, DEFAULT_VERSION};

mod common;

const TABLE: &str = r#"
middleware = ["request_id"]

[build]
prune = true

[observability]
log_level = "debug"

[[routes]]
method = "GET"
path = "/api/users/{id}"
handlers = ["users.show"]

[[routes]]
method = "GET"
path = "/api/users/{id}"
handlers = ["users.show_v1"]
version = "v1"

[[routes]]
method = "PUT"
path = "/api/files/{path*}"
handlers = ["auth", "files.put"]
"#;

#[test]
fn test_load_and_resolve() {
    let file = common::write_table(TABLE);
    let (config, router) = load_router(file.path()).unwrap();
    assert_eq!(config.observability.log_level, "debug");

    let resolved = router.handle(Method::Put, "/api/files/a/b.txt").unwrap();
    assert_eq!(resolved.handler, vec!["request_id", "auth", "files.put"]);
    assert_eq!(resolved.params["path"], "a/b.txt");

    let resolved = router.handle_in("v1", Method::Get, "/api/users/9").unwrap();
    assert_eq!(resolved.handler, vec!["request_id", "users.show_v1"]);

    let resolved = router.handle_in("v1", Method::Put, "/api/files/x").unwrap();
    assert_eq!(resolved.version, DEFAULT_VERSION);
}

#[test]
fn test_ambiguous_table_is_rejected() {
    let file = common::write_table(
        r#"
        [[routes]]
        method = "GET"
        path = "/users/{id}"
        handlers = ["show"]

        [[routes]]
        method = "GET"
        path = "/users/search"
        handlers = ["search"]
        "#,
    );
    assert!(load_config(file.path()).is_ok());
    assert!(matches!(load_router(file.path()), Err(ConfigError::Build(_))));
}
