//! Failure-absorbing envelope boundary.
//!
//! Wraps the pure [`chatonym_crypto::seal`]/[`chatonym_crypto::open`] pair
//! with salt generation and the error policy of the token layer: every
//! cryptographic failure is logged here and reported as `None`. Nothing
//! above this boundary sees an [`EnvelopeError`].

use chatonym_crypto::{CipherAlgorithm, EnvelopeError, Opened};

use crate::{config::TokenConfig, env::Environment};

/// Symmetric envelope cipher with environment-provided salts.
#[derive(Clone)]
pub struct EnvelopeCipher<E: Environment> {
    env: E,
    algorithm: CipherAlgorithm,
    salt_len: usize,
}

impl<E: Environment> EnvelopeCipher<E> {
    /// Create a cipher for `algorithm` using salts of `salt_len` bytes.
    pub fn new(env: E, algorithm: CipherAlgorithm, salt_len: usize) -> Self {
        Self { env, algorithm, salt_len }
    }

    /// Create a cipher from the token configuration.
    pub fn from_config(env: E, config: &TokenConfig) -> Self {
        Self::new(env, config.cipher, config.salt_bytes)
    }

    /// The configured cipher.
    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Draw a fresh random salt.
    pub fn generate_salt(&self) -> Vec<u8> {
        let mut salt = vec![0u8; self.salt_len];
        self.env.random_bytes(&mut salt);
        salt
    }

    /// Seal `plaintext` under `key`.
    ///
    /// A fresh salt is drawn unless `salt` is given. Returns `None` if the
    /// cipher rejects the key or salt.
    pub fn encrypt(&self, key: &[u8], plaintext: &[u8], salt: Option<&[u8]>) -> Option<String> {
        let generated;
        let salt = match salt {
            Some(salt) => salt,
            None => {
                generated = self.generate_salt();
                &generated
            },
        };

        chatonym_crypto::seal(self.algorithm, key, salt, plaintext)
            .map_err(|err| log_failure("encrypt", &err))
            .ok()
    }

    /// Open `token` under `key`.
    ///
    /// Returns `None` for any token that cannot be decrypted: not base64url,
    /// too short, wrong key, or corrupted.
    pub fn decrypt(&self, key: &[u8], token: &str) -> Option<Opened> {
        chatonym_crypto::open(self.algorithm, key, self.salt_len, token)
            .map_err(|err| log_failure("decrypt", &err))
            .ok()
    }
}

fn log_failure(operation: &'static str, err: &EnvelopeError) {
    if err.is_config() {
        tracing::error!(operation, error = %err, "envelope misconfigured");
    } else {
        tracing::warn!(operation, error = %err, "envelope operation failed");
    }
}
