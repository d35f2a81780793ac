//! Error types for the AST crate.
//!
//! This module defines structured errors for tree construction, list access,
//! rendering and reading back serialized trees.

use thiserror::Error;

use crate::nodes::NodeKind;

/// Errors that can occur while building, inspecting or rendering an AST.
#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum AstError {
    /// Growing a node container failed. The node being inserted was not stored.
    #[error("failed to allocate storage for {what} ({requested} slots requested)")]
    AllocationFailure {
        what: &'static str,
        requested: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    /// The API was used against a node kind that does not support the operation.
    #[error("`{operation}` is not supported on {kind} nodes")]
    InvalidOperation {
        operation: &'static str,
        kind: NodeKind,
    },

    /// A list was indexed past its end.
    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The rendering sink could not be written. Output may be incomplete.
    #[error("failed to write rendered AST: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document does not describe a valid tree.
    #[error("malformed AST JSON: {reason}")]
    MalformedJson { reason: String },

    /// The root slot of a syntax tree was set twice.
    #[error("syntax tree root is already set")]
    RootAlreadySet,
}

impl AstError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        AstError::MalformedJson {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AstError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            AstError::Io(err.into())
        } else {
            AstError::malformed(err.to_string())
        }
    }
}
