//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ModuleError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] ModuleError),

    #[error("invalid blueprint {}: {message}", path.display())]
    Blueprint { path: PathBuf, message: String },

    #[error("invalid name '{name}' in module {module}: {reason}")]
    InvalidName {
        module: String,
        name: String,
        reason: String,
    },

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
