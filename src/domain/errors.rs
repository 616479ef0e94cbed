use thiserror::Error;

/// Store- and workflow-level failures. The HTTP layer maps these onto status
/// codes in `crate::errors`.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}
