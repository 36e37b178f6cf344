//! Shared fixtures for integration tests.

use std::io::Write;

use tempfile::NamedTempFile;
use trie_router::Router;

/// A small API with literal, parameter and wildcard routes across two versions.
#[allow(dead_code)]
pub fn sample_router() -> Router<&'static str> {
    let mut router = Router::new();
    router.use_middleware(["request_id", "access_log"]);

    router
        .get("/", ["home"])
        .unwrap()
        .get("/users", ["users.list"])
        .unwrap()
        .post("/users", ["auth", "users.create"])
        .unwrap()
        .get("/users/{id}", ["users.show"])
        .unwrap()
        .delete("/users/{id}", ["auth", "users.delete"])
        .unwrap()
        .get("/users/{id}/posts/{post}", ["posts.show"])
        .unwrap()
        .get("/files/{path*}", ["files.serve"])
        .unwrap()
        .head("/health", ["health"])
        .unwrap();

    router
        .version("v2")
        .get("/users/{id}", ["users.show_v2"])
        .unwrap()
        .patch("/users/{id}", ["users.patch_v2"])
        .unwrap();

    router
}

/// Writes `content` to a temporary TOML file kept alive by the returned guard.
#[allow(dead_code)]
pub fn write_table(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
