//! Errors surfaced by the application layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Tracker(#[from] pedometer_core::TrackerError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl AppError {
    /// Rejected user input, as opposed to a storage or runtime failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::Tracker(pedometer_core::TrackerError::Validation(_))
        )
    }
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
