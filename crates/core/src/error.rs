//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only deterministic, caller-facing failures live here. Ledger aggregation and
/// settlement simplification never fail, so every variant originates from input
/// validation or an explicit expense mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller input was rejected. The message is safe to show to users verbatim.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant would be violated by the requested change.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested participant/record was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// The user-facing reason, without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::InvariantViolation(msg) | Self::InvalidId(msg) => msg,
            Self::NotFound => "not found",
        }
    }
}
