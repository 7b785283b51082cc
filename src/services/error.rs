use thiserror::Error;

/// Failures a caller can act on. Services return them inside `anyhow::Error`
/// and the web layer downcasts to pick a status code.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("authentication required")]
    Unauthenticated,
    #[error("permission denied")]
    Forbidden,
    #[error("folder is password protected")]
    Locked,
    #[error("too many attempts, try again later")]
    RateLimited,
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
