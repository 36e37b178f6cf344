//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check path patterns are well formed (whole-segment, named tokens)
//! - Check every route has handlers and a version label
//! - Check the log level is one we know
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Duplicates and ambiguous siblings are left to the router build, which
//!   sees the resolved tree

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::observability::logging::LOG_LEVELS;
use crate::routing::path::segments;

/// A single semantic problem in a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index} ({path}): no handlers")]
    NoHandlers { index: usize, path: String },

    #[error("route #{index} ({path}): empty version label")]
    EmptyVersion { index: usize, path: String },

    #[error("route #{index} ({path}): parameter token must fill the whole segment '{segment}'")]
    MalformedSegment {
        index: usize,
        path: String,
        segment: String,
    },

    #[error("route #{index} ({path}): invalid parameter name in '{segment}'")]
    InvalidParameter {
        index: usize,
        path: String,
        segment: String,
    },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Validates a route table.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.handlers.is_empty() {
            errors.push(ValidationError::NoHandlers {
                index,
                path: route.path.clone(),
            });
        }
        if route.version.trim().is_empty() {
            errors.push(ValidationError::EmptyVersion {
                index,
                path: route.path.clone(),
            });
        }
        for segment in segments(&route.path) {
            if let Some(err) = check_segment(index, &route.path, segment) {
                errors.push(err);
            }
        }
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_segment(index: usize, path: &str, segment: &str) -> Option<ValidationError> {
    let opens = segment.matches('{').count();
    let closes = segment.matches('}').count();
    if opens == 0 && closes == 0 {
        return None;
    }

    let whole_token =
        opens == 1 && closes == 1 && segment.starts_with('{') && segment.ends_with('}');
    if !whole_token {
        return Some(ValidationError::MalformedSegment {
            index,
            path: path.to_string(),
            segment: segment.to_string(),
        });
    }

    let inner = &segment[1..segment.len() - 1];
    let name = inner.strip_suffix('*').unwrap_or(inner);
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        None
    } else {
        Some(ValidationError::InvalidParameter {
            index,
            path: path.to_string(),
            segment: segment.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;
    use crate::routing::Method;

    fn route(path: &str, handlers: &[&str]) -> RouteConfig {
        RouteConfig {
            method: Method::Get,
            path: path.to_string(),
            handlers: handlers.iter().map(|h| h.to_string()).collect(),
            version: "DEFAULT".to_string(),
        }
    }

    #[test]
    fn test_valid_table() {
        let config = RouterConfig {
            routes: vec![
                route("/users/{id}", &["show"]),
                route("/files/{path*}", &["files"]),
                route("/", &["home"]),
            ],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad_version = route("/ok", &["h"]);
        bad_version.version = " ".into();
        let mut config = RouterConfig {
            routes: vec![
                route("/users", &[]),
                route("/users/{id", &["h"]),
                route("/users/{}", &["h"]),
                route("/users/{bad name}", &["h"]),
                route("/v{major}", &["h"]),
                bad_version,
            ],
            ..Default::default()
        };
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 7);
        assert!(matches!(errors[0], ValidationError::NoHandlers { index: 0, .. }));
        assert!(matches!(errors[1], ValidationError::MalformedSegment { index: 1, .. }));
        assert!(matches!(errors[2], ValidationError::InvalidParameter { index: 2, .. }));
        assert!(matches!(errors[3], ValidationError::InvalidParameter { index: 3, .. }));
        assert!(matches!(errors[4], ValidationError::MalformedSegment { index: 4, .. }));
        assert!(matches!(errors[5], ValidationError::EmptyVersion { index: 5, .. }));
        assert_eq!(errors[6], ValidationError::UnknownLogLevel("loud".into()));
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::NoHandlers {
            index: 3,
            path: "/a".into(),
        };
        assert_eq!(err.to_string(), "route #3 (/a): no handlers");
    }
}
