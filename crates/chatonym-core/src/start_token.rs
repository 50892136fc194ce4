//! Start tokens: encrypted invitations.
//!
//! A start token carries a [`StartTuple`] sealed under the start key. The
//! codec remembers the last token issued to each recipient, so asking for a
//! link twice within the cache lifetime returns the same link.

use std::sync::Arc;

use crate::{
    cache::TokenCache,
    config::TokenConfig,
    env::Environment,
    envelope::EnvelopeCipher,
    error::{ConfigError, TokenError},
    secrets::SecretContext,
    tuple::{Decrypted, StartTuple},
};

/// Encrypts and decrypts start tokens.
pub struct StartTokenCodec<E: Environment> {
    secrets: Arc<SecretContext>,
    cipher: EnvelopeCipher<E>,
    cache: TokenCache<i64, E>,
    env: E,
}

impl<E: Environment> StartTokenCodec<E> {
    /// Create a codec with its own cache sized by `config`.
    ///
    /// # Errors
    ///
    /// - `ZeroCacheCapacity`: `config.cache_max_entries` is zero
    pub fn new(
        secrets: Arc<SecretContext>,
        config: &TokenConfig,
        env: E,
    ) -> Result<Self, ConfigError> {
        let cache = TokenCache::new(env.clone(), config.cache_capacity()?, config.cache_ttl);
        let cipher = EnvelopeCipher::from_config(env.clone(), config);
        Ok(Self::with_parts(secrets, cipher, cache, env))
    }

    /// Create a codec from explicit parts.
    pub fn with_parts(
        secrets: Arc<SecretContext>,
        cipher: EnvelopeCipher<E>,
        cache: TokenCache<i64, E>,
        env: E,
    ) -> Self {
        Self { secrets, cipher, cache, env }
    }

    /// Issue a start token for `recipient_id`.
    ///
    /// Returns the cached token if one was issued within the cache lifetime.
    /// Otherwise draws a fresh seed and seals a new tuple. `Ok(None)` means
    /// the cipher failed; nothing is cached in that case.
    ///
    /// # Errors
    ///
    /// - `UnsafeInteger`: `recipient_id` is outside the safe integer range
    pub fn encrypt(&self, recipient_id: i64) -> Result<Option<String>, TokenError> {
        if let Some(token) = self.cache.get(&recipient_id) {
            tracing::debug!("start token cache hit");
            return Ok(Some(token));
        }

        let tuple = StartTuple::try_new(recipient_id, i64::from(self.env.random_u32()))?;
        let bytes = tuple.serialize()?;

        let Some(token) = self.cipher.encrypt(self.secrets.start_key(), &bytes, None) else {
            return Ok(None);
        };

        self.cache.insert(recipient_id, token.clone());
        Ok(Some(token))
    }

    /// Open a start token.
    ///
    /// `Ok(None)` means the token could not be decrypted under the start key.
    ///
    /// # Errors
    ///
    /// - `TooShort` / `UnsafeInteger`: the decrypted bytes are not a valid
    ///   start tuple
    pub fn decrypt(&self, token: &str) -> Result<Option<Decrypted<StartTuple>>, TokenError> {
        let Some(opened) = self.cipher.decrypt(self.secrets.start_key(), token) else {
            return Ok(None);
        };

        let tuple = StartTuple::deserialize(&opened.plaintext)?;
        Ok(Some(Decrypted { tuple, salt: opened.salt }))
    }

    /// The codec's idempotency cache.
    pub fn cache(&self) -> &TokenCache<i64, E> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicU8, Ordering},
        time::Duration,
    };

    use base64::Engine;
    use chatonym_crypto::BASE64URL;

    use super::*;
    use crate::secrets::SecretBundle;

    #[derive(Clone, Default)]
    struct TestEnv {
        counter: Arc<AtomicU8>,
    }

    impl Environment for TestEnv {
        type Instant = Duration;

        fn now(&self) -> Duration {
            Duration::ZERO
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let value = self.counter.fetch_add(1, Ordering::SeqCst);
            buffer.fill(value);
        }
    }

    fn secrets() -> Arc<SecretContext> {
        let bundle = SecretBundle {
            start_secret: BASE64URL.encode([0x01; 32]),
            chat_secret: BASE64URL.encode([0x02; 32]),
            nick_pepper: "nick".to_string(),
            chat_hash_pepper: "hash".to_string(),
        };
        Arc::new(SecretContext::new(bundle).unwrap())
    }

    fn codec() -> StartTokenCodec<TestEnv> {
        StartTokenCodec::new(secrets(), &TokenConfig::default(), TestEnv::default()).unwrap()
    }

    #[test]
    fn roundtrip() {
        let codec = codec();
        let token = codec.encrypt(42).unwrap().unwrap();
        let decrypted = codec.decrypt(&token).unwrap().unwrap();

        assert_eq!(decrypted.tuple.recipient_id, 42);
        assert_eq!(BASE64URL.decode(&decrypted.salt).unwrap().len(), 16);
    }

    #[test]
    fn repeated_encrypt_hits_cache() {
        let codec = codec();
        let first = codec.encrypt(5).unwrap().unwrap();
        let second = codec.encrypt(5).unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(codec.cache().len(), 1);
    }

    #[test]
    fn distinct_recipients_get_distinct_tokens() {
        let codec = codec();
        assert_ne!(codec.encrypt(5).unwrap(), codec.encrypt(6).unwrap());
    }

    #[test]
    fn unsafe_recipient_rejected() {
        let result = codec().encrypt(1 << 53);
        assert!(matches!(result, Err(TokenError::UnsafeInteger { .. })));
    }

    #[test]
    fn foreign_token_is_none() {
        assert_eq!(codec().decrypt("not-a-token").unwrap(), None);
    }

    #[test]
    fn cipher_failure_is_not_cached() {
        let env = TestEnv::default();
        let config = TokenConfig::default();
        // 12-byte salts are rejected by AES-CBC
        let cipher = EnvelopeCipher::new(env.clone(), config.cipher, 12);
        let cache = TokenCache::new(env.clone(), config.cache_capacity().unwrap(), config.cache_ttl);
        let codec = StartTokenCodec::with_parts(secrets(), cipher, cache, env);

        assert_eq!(codec.encrypt(5).unwrap(), None);
        assert!(codec.cache().is_empty());
    }
}
