//! Token protocol configuration.

use std::{num::NonZeroUsize, time::Duration};

use chatonym_crypto::{CipherAlgorithm, HashAlgorithm};

use crate::error::ConfigError;

/// Default idempotency cache capacity per codec
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default idempotency cache entry lifetime (4 hours)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(14_400);

/// Default length of generated keys and peppers in bytes
pub const DEFAULT_SECRET_BYTES: usize = 32;

/// Configuration shared by every token component.
///
/// Defaults match the deployed system: AES-256-CBC with a 16-byte salt,
/// SHA-256 hashing, 10 000-entry caches living 4 hours, and 32-byte keys and
/// peppers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Cipher used to seal tokens
    pub cipher: CipherAlgorithm,
    /// Salt (IV) length prepended to every token
    pub salt_bytes: usize,
    /// Hash used for fingerprints and pseudonyms
    pub hash: HashAlgorithm,
    /// Maximum entries per idempotency cache
    pub cache_max_entries: usize,
    /// Lifetime of an idempotency cache entry
    pub cache_ttl: Duration,
    /// Length of generated encryption keys
    pub secret_bytes: usize,
    /// Length of generated peppers
    pub pepper_bytes: usize,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            cipher: CipherAlgorithm::default(),
            salt_bytes: CipherAlgorithm::BLOCK_SIZE,
            hash: HashAlgorithm::default(),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cache_ttl: DEFAULT_CACHE_TTL,
            secret_bytes: DEFAULT_SECRET_BYTES,
            pepper_bytes: DEFAULT_SECRET_BYTES,
        }
    }
}

impl TokenConfig {
    /// Check that the options are consistent with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache_capacity()?;

        if self.cache_ttl.is_zero() {
            return Err(ConfigError::ZeroCacheTtl);
        }

        if self.salt_bytes != self.cipher.iv_len() {
            return Err(ConfigError::SaltLength {
                expected: self.cipher.iv_len(),
                actual: self.salt_bytes,
            });
        }

        if self.secret_bytes != self.cipher.key_len() {
            return Err(ConfigError::SecretLength {
                expected: self.cipher.key_len(),
                actual: self.secret_bytes,
            });
        }

        if self.pepper_bytes == 0 {
            return Err(ConfigError::ZeroPepperLength);
        }

        Ok(())
    }

    /// Cache capacity as the non-zero size the LRU requires.
    pub fn cache_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.cache_max_entries).ok_or(ConfigError::ZeroCacheCapacity)
    }
}
