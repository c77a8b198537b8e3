//! Error model shared by the workflow extension functions.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Represents failure conditions raised by the extension functions, including invalid post function settings, failed clone batches, host data-access problems and filesystem errors.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("invalid post function settings: {0}")]
    Configuration(String),
    #[error("cannot clone issue")]
    CloneFailed,
    #[error("data access error: {0}")]
    DataAccess(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl WorkflowError {
    /// Constructs a data-access error from any displayable cause.
    pub fn data_access(message: impl Into<String>) -> Self {
        WorkflowError::DataAccess(message.into())
    }
}

impl From<serde_json::Error> for WorkflowError {
    /// Converts custom field value encode/decode failures into serialization errors.
    fn from(err: serde_json::Error) -> Self {
        WorkflowError::Serialization(err.to_string())
    }
}
