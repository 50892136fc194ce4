//! Relay error types.

use std::fmt;

use chatonym_core::{ConfigError, SecretError, TokenError};

use crate::storage::StorageError;

/// Errors that can occur in the relay.
#[derive(Debug)]
pub enum ServerError {
    /// Configuration error (invalid cipher options, cache sizing, etc.).
    ///
    /// Fatal at startup. Fix configuration and restart.
    Config(ConfigError),

    /// Secret bundle error (double initialization, missing or corrupt
    /// secrets).
    ///
    /// Fatal unless it is `NotInitialized`, which means `init` was skipped.
    Secret(SecretError),

    /// Storage error (database I/O, duplicate secret rows).
    ///
    /// I/O failures may be transient; invariant violations need an operator.
    Storage(StorageError),

    /// Token data failed validation.
    ///
    /// Either a caller passed an out-of-range identity, or a token decrypted
    /// to bytes that are not a valid tuple (tampering).
    Token(TokenError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Secret(err) => write!(f, "secret error: {err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::Token(err) => write!(f, "token error: {err}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Secret(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Token(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<SecretError> for ServerError {
    fn from(err: SecretError) -> Self {
        Self::Secret(err)
    }
}

impl From<StorageError> for ServerError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<TokenError> for ServerError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}
