//! Routing error definitions.

use thiserror::Error;

use crate::routing::method::Method;

/// Broad category of a [`RouterError`].
///
/// Configuration errors surface while building the table and should abort
/// startup. Lookup and routing errors surface per request; the transport
/// decides how to answer them (typically 404/405).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Lookup,
    Routing,
}

/// Errors produced while registering or resolving routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The (version, node, method) triple already has a handler chain.
    #[error("duplicate handler for {method} {path} in version {version}")]
    DuplicateHandler {
        method: Method,
        path: String,
        version: String,
    },

    /// A child would be attached next to a parameter-first sibling.
    #[error("ambiguous route {path}: {parent} already has parameter child {existing}")]
    AmbiguousRoute {
        parent: String,
        existing: String,
        path: String,
    },

    /// A non-root node was asked to insert a path it shares nothing with.
    #[error("could not find common root node for {path} under {node}")]
    NoCommonRoot { node: String, path: String },

    #[error("unknown version: {0}")]
    UnknownVersion(String),

    #[error("no route node at {path} in version {version}")]
    NodeNotFound { path: String, version: String },

    #[error("no handler for {method} {url}")]
    NoHandler { method: Method, url: String },
}

impl RouterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::DuplicateHandler { .. }
            | RouterError::AmbiguousRoute { .. }
            | RouterError::NoCommonRoot { .. } => ErrorKind::Configuration,
            RouterError::UnknownVersion(_) | RouterError::NodeNotFound { .. } => ErrorKind::Lookup,
            RouterError::NoHandler { .. } => ErrorKind::Routing,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

/// Result type for routing operations.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::DuplicateHandler {
            method: Method::Get,
            path: "/users".into(),
            version: "DEFAULT".into(),
        };
        assert_eq!(err.to_string(), "duplicate handler for GET /users in version DEFAULT");

        let err = RouterError::NoHandler {
            method: Method::Post,
            url: "/nowhere".into(),
        };
        assert_eq!(err.to_string(), "no handler for POST /nowhere");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(RouterError::UnknownVersion("v9".into()).kind(), ErrorKind::Lookup);
        assert!(RouterError::NoCommonRoot {
            node: "/a".into(),
            path: "b".into()
        }
        .is_configuration());
        assert_eq!(
            RouterError::NoHandler {
                method: Method::Get,
                url: "/".into()
            }
            .kind(),
            ErrorKind::Routing
        );
    }
}
