//! Configuration schema definitions.
//!
//! This module defines the route-table file format. All types derive Serde
//! traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::routing::{Method, DEFAULT_VERSION};

/// Root configuration: a route table plus build and logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Handler names prepended to every resolved chain, in order.
    pub middleware: Vec<String>,

    /// Route definitions.
    pub routes: Vec<RouteConfig>,

    /// Table build options.
    pub build: BuildConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// One (method, path, version) binding.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    pub method: Method,

    /// Path pattern, e.g. `/users/{id}` or `/files/{path*}`.
    pub path: String,

    /// Handler names, in execution order.
    pub handlers: Vec<String>,

    /// Version label (default: `DEFAULT`).
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Options applied once all routes are registered.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Compact every version tree after registration.
    pub prune: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { prune: true }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Include event targets in log lines.
    pub show_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_target: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert!(config.routes.is_empty());
        assert!(config.build.prune);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_parse_route_table() {
        let config: RouterConfig = toml::from_str(
            r#"
            middleware = ["request_id"]

            [build]
            prune = false

            [[routes]]
            method = "GET"
            path = "/users/{id}"
            handlers = ["auth", "users.show"]

            [[routes]]
            method = "DELETE"
            path = "/users/{id}"
            handlers = ["users.delete"]
            version = "v2"
            "#,
        )
        .unwrap();

        assert_eq!(config.middleware, vec!["request_id"]);
        assert!(!config.build.prune);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].method, Method::Get);
        assert_eq!(config.routes[0].version, DEFAULT_VERSION);
        assert_eq!(config.routes[1].version, "v2");
    }

    #[test]
    fn test_unknown_method_is_a_parse_error() {
        let result: Result<RouterConfig, _> = toml::from_str(
            r#"
            [[routes]]
            method = "BREW"
            path = "/coffee"
            handlers = ["pot"]
            "#,
        );
        assert!(result.is_err());
    }
}
