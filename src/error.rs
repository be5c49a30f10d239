use sea_orm::DbErr;
use thiserror::Error;

/// Failures raised by the item repository and lifecycle engine.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Bad or missing required field
    #[error("{0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    /// Store unavailable, or a stored row could not be decoded
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ItemError {
    pub fn validation(message: impl Into<String>) -> Self {
        ItemError::Validation(message.into())
    }
}
