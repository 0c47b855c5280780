//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::list::RecordId;
use crate::domain::tree::NodeId;

/// Domain errors represent structural misuse or broken invariants.
///
/// They are raised before any mutation takes place, so the structure is left
/// untouched when an operation fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("record {0} does not belong to this list")]
    UnknownRecord(RecordId),

    #[error("node {node} does not belong to tree '{tag}'")]
    UnknownNode { node: NodeId, tag: String },

    #[error("list invariant violated in {operation}: {detail}")]
    ListInvariant {
        operation: &'static str,
        detail: String,
    },

    #[error("tree invariant violated in '{tag}': {detail}")]
    TreeInvariant { tag: String, detail: String },
}

impl DomainError {
    pub(crate) fn list_invariant(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::ListInvariant {
            operation,
            detail: detail.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
