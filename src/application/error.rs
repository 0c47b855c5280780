//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid node path '{path}': {reason}")]
    NodePath { path: String, reason: String },

    #[error("aggregate '{aggregate}' needs an attribute, pass --attr")]
    MissingAttribute { aggregate: String },

    #[error("attribute '{attribute}' at position {position} is not numeric: {value}")]
    NotNumeric {
        attribute: String,
        position: usize,
        value: String,
    },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
