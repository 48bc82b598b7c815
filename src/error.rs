//! Error taxonomy shared by the manager, the persistence gateway and the
//! API layer.

use thiserror::Error;

/// Failures a board operation can surface.
///
/// Validation and not-found errors are client-facing and recoverable at the
/// API boundary; persistence errors are not locally recoverable and the
/// caller must retry the whole request.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input. Carries every violation found in the
    /// offending request, not just the first.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        entity: &'static str,
        id: i64,
    },

    /// A statement or commit failed. Nothing from the surrounding unit of
    /// work is observable.
    #[error("persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl Error {
    /// Single-message validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
