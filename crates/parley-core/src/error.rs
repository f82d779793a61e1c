//! Domain error types

use crate::ids::IdParseError;

/// Errors produced by domain-level validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    InvalidId(#[from] IdParseError),

    #[error("message content is empty")]
    EmptyMessage,
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
