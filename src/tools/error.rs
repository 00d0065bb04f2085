//! Tool-level error type

use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// True when the caller can fix the request and retry
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ToolError::Internal(_)
                | ToolError::Storage(
                    StorageError::Connection(_)
                        | StorageError::Query(_)
                        | StorageError::Corrupt(_)
                        | StorageError::Migration(_)
                )
        )
    }
}
