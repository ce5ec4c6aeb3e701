//! Error types for fmea.
//!
//! This module defines all error types used throughout the fmea crate.
//! Rating coercion never fails: missing or unusable ratings silently count
//! as 1, so there is no error variant for them.

use std::path::PathBuf;
use thiserror::Error;

use crate::tree::NodeType;

/// The main error type for fmea operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A field of user input failed validation.
    ///
    /// This is reported back to the editing surface as a field-level message;
    /// the tree is left untouched.
    #[error("{field}: {message}")]
    Validation {
        /// Name of the offending input field.
        field: &'static str,
        /// Message suitable for display next to the field.
        message: String,
    },

    // === Tree Errors ===
    /// No node with the given id exists in the tree.
    #[error("no node with id '{id}'")]
    NodeNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The node exists but is not of the expected type.
    #[error("node '{id}' is a {actual}, expected a {expected}")]
    WrongNodeType {
        /// The id that was looked up.
        id: String,
        /// The type the operation required.
        expected: NodeType,
        /// The type the node actually has.
        actual: NodeType,
    },

    /// A function node has no parent to key its overlay data under.
    #[error("function '{id}' has no parent node")]
    OrphanFunction {
        /// Id of the function.
        id: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to read an analysis input file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fmea operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a field-level validation error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a node-not-found error.
    #[must_use]
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create a wrong-node-type error.
    #[must_use]
    pub fn wrong_node_type(id: impl Into<String>, expected: NodeType, actual: NodeType) -> Self {
        Self::WrongNodeType {
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error is a failed node lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = Error::validation("name", "Name is required");
        assert_eq!(err.to_string(), "name: Name is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_node_not_found_display() {
        let err = Error::node_not_found("engine");
        assert_eq!(err.to_string(), "no node with id 'engine'");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_wrong_node_type_display() {
        let err = Error::wrong_node_type("engine", NodeType::Function, NodeType::Component);
        assert_eq!(
            err.to_string(),
            "node 'engine' is a component, expected a function"
        );
    }

    #[test]
    fn test_orphan_function_display() {
        let err = Error::OrphanFunction {
            id: "generate_thrust".to_string(),
        };
        assert!(err.to_string().contains("generate_thrust"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "thresholds out of order".to_string(),
        };
        assert!(err.to_string().contains("thresholds out of order"));
    }

    #[test]
    fn test_read_file_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::ReadFile {
            path: PathBuf::from("/tmp/tree.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/tree.json"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
