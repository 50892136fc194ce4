//! Storage abstraction for the relay.
//!
//! The relay persists exactly two things: the encoded secret bundle (one row,
//! written once) and the fingerprints of terminated conversations. The trait
//! is synchronous, like every other component of the relay.

mod error;
mod memory;
mod redb;

use chatonym_core::Fingerprint;
pub use error::StorageError;
pub use memory::MemoryStorage;

pub use self::redb::RedbStorage;

/// Storage for the secret blob and the termination ledger.
///
/// Must be Clone (shared by the secret store and the exchange), Send + Sync,
/// and synchronous. Implementations share internal state, so clones see the
/// same data.
pub trait Storage: Clone + Send + Sync + 'static {
    /// The stored secret blob, if any.
    ///
    /// # Errors
    ///
    /// - `Invariant`: more than one secret row exists
    fn get_secrets(&self) -> Result<Option<String>, StorageError>;

    /// Store the secret blob.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists`: a secret row is already present
    fn set_secrets(&self, blob: &str) -> Result<(), StorageError>;

    /// Returns true if the conversation has been terminated.
    fn is_terminated(&self, fingerprint: &Fingerprint) -> Result<bool, StorageError>;

    /// Record a terminated conversation.
    ///
    /// Idempotent: terminating twice is a no-op.
    fn terminate(&self, fingerprint: &Fingerprint) -> Result<(), StorageError>;
}
