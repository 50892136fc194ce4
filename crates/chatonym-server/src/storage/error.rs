//! Storage error types.

use thiserror::Error;

/// Errors from storage backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Backend I/O failure (database open, transaction, commit).
    ///
    /// May be transient. The operation had no effect.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// Secrets were written while a secret row already exists.
    ///
    /// Overwriting would invalidate every token issued so far.
    #[error("secrets already stored")]
    AlreadyExists,

    /// Stored data violates a structural invariant.
    ///
    /// For example more than one secret row. Requires operator attention.
    #[error("storage invariant violated: {0}")]
    Invariant(String),
}

impl StorageError {
    /// Returns true if retrying the operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
