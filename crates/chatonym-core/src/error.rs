//! Error types for the token protocol
//!
//! Three tiers, matching how callers are expected to react:
//! - `TokenError`: malformed or out-of-range tuple data (programming error
//!   or tampering), returned immediately
//! - Cryptographic failures never appear here; codecs report them as `None`
//! - `SecretError` / `ConfigError`: operational problems that should stop
//!   startup or alert an operator

use std::fmt;

use thiserror::Error;

use crate::secrets::SecretName;

/// Identity field of a tuple, used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    /// The party the token is addressed to
    Recipient,
    /// The party that sent the message
    Sender,
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recipient => f.write_str("recipient_id"),
            Self::Sender => f.write_str("sender_id"),
        }
    }
}

/// Errors from encoding or decoding identity tuples
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Identity is outside the safe integer range
    #[error("{field} must be a safe integer, got {value}")]
    UnsafeInteger {
        /// Which identity field was out of range
        field: IdField,
        /// The offending value
        value: i64,
    },

    /// Seed is not a 32-bit unsigned integer
    #[error("seed must be a 32 bit unsigned integer, got {0}")]
    SeedOutOfRange(i64),

    /// Buffer is shorter than the minimum tuple size
    #[error("buffer too short: need at least {min} bytes, got {actual}")]
    TooShort {
        /// Minimum number of bytes required
        min: usize,
        /// Number of bytes provided
        actual: usize,
    },

    /// Buffer does not have the exact tuple size
    #[error("invalid buffer length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required number of bytes
        expected: usize,
        /// Number of bytes provided
        actual: usize,
    },
}

/// Errors from loading or reading the secret bundle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// Secrets were read before initialization
    #[error("secrets not initialized")]
    NotInitialized,

    /// Initialization was attempted twice
    ///
    /// Re-initializing would replace the keys and invalidate every token
    /// already handed out.
    #[error("secrets already initialized")]
    AlreadyInitialized,

    /// A named secret is absent or empty
    #[error("secret {0} not found")]
    Missing(SecretName),

    /// A secret is not valid base64url key material
    #[error("secret {name} is not valid base64url: {reason}")]
    InvalidEncoding {
        /// The secret that failed to decode
        name: SecretName,
        /// Decoder message
        reason: String,
    },

    /// The persisted bundle blob could not be encoded or decoded
    #[error("invalid secret bundle: {0}")]
    Blob(String),
}

impl SecretError {
    /// Returns true if this error is fatal for the process.
    ///
    /// Fatal errors mean the stored secrets cannot be trusted or used. A
    /// missing initialization is recoverable by initializing.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::AlreadyInitialized => true,
            Self::Missing(_) => true,
            Self::InvalidEncoding { .. } => true,
            Self::Blob(_) => true,

            Self::NotInitialized => false,
        }
    }
}

/// Errors from invalid token configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Cache capacity must be at least one entry
    #[error("cache capacity must be non-zero")]
    ZeroCacheCapacity,

    /// Cache entries must live for a non-zero duration
    #[error("cache TTL must be non-zero")]
    ZeroCacheTtl,

    /// Salt length must equal the cipher's IV size
    #[error("salt must be {expected} bytes for this cipher, got {actual}")]
    SaltLength {
        /// IV size of the configured cipher
        expected: usize,
        /// Configured salt length
        actual: usize,
    },

    /// Generated key length must equal the cipher's key size
    #[error("secret must be {expected} bytes for this cipher, got {actual}")]
    SecretLength {
        /// Key size of the configured cipher
        expected: usize,
        /// Configured secret length
        actual: usize,
    },

    /// Peppers must not be empty
    #[error("pepper length must be non-zero")]
    ZeroPepperLength,

    /// Pseudonym word lists must not be empty
    #[error("pseudonym word list is empty")]
    EmptyWordList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_error_display() {
        let err = TokenError::UnsafeInteger { field: IdField::Recipient, value: 1 << 53 };
        assert_eq!(err.to_string(), "recipient_id must be a safe integer, got 9007199254740992");

        let err = TokenError::InvalidLength { expected: 20, actual: 19 };
        assert_eq!(err.to_string(), "invalid buffer length: expected 20, got 19");
    }

    #[test]
    fn secret_error_display() {
        let err = SecretError::Missing(SecretName::ChatHashPepper);
        assert_eq!(err.to_string(), "secret chatHashPepper not found");
    }

    #[test]
    fn already_initialized_is_fatal() {
        assert!(SecretError::AlreadyInitialized.is_fatal());
        assert!(!SecretError::NotInitialized.is_fatal());
    }
}
