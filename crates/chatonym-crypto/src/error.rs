//! Error types for envelope and digest operations

use thiserror::Error;

/// Errors from sealing or opening a token envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Key length does not match the cipher
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Key length required by the cipher
        expected: usize,
        /// Key length provided
        actual: usize,
    },

    /// Salt length does not match the cipher's IV size
    #[error("invalid salt length: expected {expected}, got {actual}")]
    InvalidSaltLength {
        /// Salt length required by the cipher
        expected: usize,
        /// Salt length provided
        actual: usize,
    },

    /// Token text is not valid base64url
    #[error("malformed token encoding: {0}")]
    Malformed(String),

    /// Decoded token is too short or not block aligned
    #[error("truncated token: {len} bytes")]
    Truncated {
        /// Length of the decoded token or ciphertext
        len: usize,
    },

    /// PKCS#7 padding check failed (wrong key or corrupted ciphertext)
    #[error("bad padding")]
    BadPadding,

    /// Algorithm name is not supported
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

impl EnvelopeError {
    /// Returns true if this error comes from configuration, not from input.
    ///
    /// Configuration errors affect every token and should be surfaced to an
    /// operator. Input errors are expected for foreign or damaged tokens.
    pub fn is_config(&self) -> bool {
        match self {
            Self::InvalidKeyLength { .. } => true,
            Self::InvalidSaltLength { .. } => true,
            Self::UnsupportedAlgorithm(_) => true,

            Self::Malformed(_) => false,
            Self::Truncated { .. } => false,
            Self::BadPadding => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_length_is_config_error() {
        let err = EnvelopeError::InvalidKeyLength { expected: 32, actual: 1 };
        assert!(err.is_config());
    }

    #[test]
    fn bad_padding_is_input_error() {
        assert!(!EnvelopeError::BadPadding.is_config());
    }

    #[test]
    fn error_display() {
        let err = EnvelopeError::Truncated { len: 7 };
        assert_eq!(err.to_string(), "truncated token: 7 bytes");
    }
}
