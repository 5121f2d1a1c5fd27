use sea_orm::DbErr;
use thiserror::Error;

/// Error taxonomy shared by every service. Handlers map these onto HTTP
/// status codes; nothing here is surface-specific.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("admin privileges required")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Store-level failure. The enclosing transaction has rolled back,
    /// so the operation is safe to retry.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ServiceError::Conflict(msg.into())
    }
}
