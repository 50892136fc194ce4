//! Chat tokens: one encrypted leg of a conversation.
//!
//! A chat token carries a [`ChatTuple`] sealed under the chat key. Whoever
//! holds it can reply to `recipient_id`; the reply carries the rotated token
//! so the counterpart can answer back.

use std::sync::Arc;

use crate::{
    cache::TokenCache,
    config::TokenConfig,
    env::Environment,
    envelope::EnvelopeCipher,
    error::{ConfigError, TokenError},
    secrets::SecretContext,
    tuple::{ChatTuple, Decrypted},
};

/// Encrypts and decrypts chat tokens.
pub struct ChatTokenCodec<E: Environment> {
    secrets: Arc<SecretContext>,
    cipher: EnvelopeCipher<E>,
    cache: TokenCache<String, E>,
}

impl<E: Environment> ChatTokenCodec<E> {
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
        let cipher = EnvelopeCipher::from_config(env, config);
        Ok(Self::with_parts(secrets, cipher, cache))
    }

    /// Create a codec from explicit parts.
    pub fn with_parts(
        secrets: Arc<SecretContext>,
        cipher: EnvelopeCipher<E>,
        cache: TokenCache<String, E>,
    ) -> Self {
        Self { secrets, cipher, cache }
    }

    /// Issue the token for `tuple`.
    ///
    /// Cached per `sender#recipient#seed`. `Ok(None)` means the cipher
    /// failed; nothing is cached in that case.
    ///
    /// # Errors
    ///
    /// - `UnsafeInteger`: an identity is outside the safe integer range
    pub fn encrypt(&self, tuple: &ChatTuple) -> Result<Option<String>, TokenError> {
        let key = tuple.cache_key();
        if let Some(token) = self.cache.get(&key) {
            tracing::debug!("chat token cache hit");
            return Ok(Some(token));
        }

        let bytes = tuple.serialize()?;
        let Some(token) = self.cipher.encrypt(self.secrets.chat_key(), &bytes, None) else {
            return Ok(None);
        };

        self.cache.insert(key, token.clone());
        Ok(Some(token))
    }

    /// Issue the counterpart's token: `tuple` with sender and recipient
    /// swapped.
    pub fn encrypt_rotated(&self, tuple: &ChatTuple) -> Result<Option<String>, TokenError> {
        self.encrypt(&tuple.rotated())
    }

    /// Open a chat token.
    ///
    /// `Ok(None)` means the token could not be decrypted under the chat key.
    ///
    /// # Errors
    ///
    /// - `InvalidLength` / `UnsafeInteger`: the decrypted bytes are not a
    ///   valid chat tuple
    pub fn decrypt(&self, token: &str) -> Result<Option<Decrypted<ChatTuple>>, TokenError> {
        let Some(opened) = self.cipher.decrypt(self.secrets.chat_key(), token) else {
            return Ok(None);
        };

        let tuple = ChatTuple::deserialize(&opened.plaintext)?;
        Ok(Some(Decrypted { tuple, salt: opened.salt }))
    }

    /// The codec's idempotency cache.
    pub fn cache(&self) -> &TokenCache<String, E> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use base64::Engine;
    use chatonym_crypto::BASE64URL;

    use super::*;
    use crate::secrets::SecretBundle;

    #[derive(Clone)]
    struct TestEnv;

    impl Environment for TestEnv {
        type Instant = Duration;

        fn now(&self) -> Duration {
            Duration::ZERO
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(0x33);
        }
    }

    fn codec() -> ChatTokenCodec<TestEnv> {
        let bundle = SecretBundle {
            start_secret: BASE64URL.encode([0x01; 32]),
            chat_secret: BASE64URL.encode([0x02; 32]),
            nick_pepper: "nick".to_string(),
            chat_hash_pepper: "hash".to_string(),
        };
        let secrets = Arc::new(SecretContext::new(bundle).unwrap());
        ChatTokenCodec::new(secrets, &TokenConfig::default(), TestEnv).unwrap()
    }

    #[test]
    fn roundtrip() {
        let codec = codec();
        let tuple = ChatTuple::try_new(7, 9, 123).unwrap();

        let token = codec.encrypt(&tuple).unwrap().unwrap();
        let decrypted = codec.decrypt(&token).unwrap().unwrap();

        assert_eq!(decrypted.tuple, tuple);
    }

    #[test]
    fn rotated_token_decrypts_to_swapped_tuple() {
        let codec = codec();
        let tuple = ChatTuple::try_new(7, 9, 123).unwrap();

        let token = codec.encrypt_rotated(&tuple).unwrap().unwrap();
        let decrypted = codec.decrypt(&token).unwrap().unwrap();

        assert_eq!(decrypted.tuple.sender_id, 9);
        assert_eq!(decrypted.tuple.recipient_id, 7);
        assert_eq!(decrypted.tuple.seed, 123);
    }

    #[test]
    fn cache_keyed_by_full_tuple() {
        let codec = codec();
        let tuple = ChatTuple::try_new(7, 9, 123).unwrap();

        codec.encrypt(&tuple).unwrap();
        codec.encrypt(&tuple).unwrap();
        codec.encrypt_rotated(&tuple).unwrap();

        assert_eq!(codec.cache().len(), 2);
    }

    #[test]
    fn start_token_bytes_are_not_a_chat_tuple() {
        let codec = codec();
        // A 12-byte plaintext sealed under the chat key
        let token = chatonym_crypto::seal(
            chatonym_crypto::CipherAlgorithm::Aes256Cbc,
            &[0x02; 32],
            &[0; 16],
            &[0; 12],
        )
        .unwrap();

        assert_eq!(
            codec.decrypt(&token),
            Err(TokenError::InvalidLength { expected: 20, actual: 12 })
        );
    }

    #[test]
    fn cipher_failure_is_not_cached() {
        let bundle = SecretBundle {
            start_secret: BASE64URL.encode([0x01; 32]),
            chat_secret: BASE64URL.encode([0x02; 32]),
            nick_pepper: "nick".to_string(),
            chat_hash_pepper: "hash".to_string(),
        };
        let secrets = Arc::new(SecretContext::new(bundle).unwrap());
        let config = TokenConfig::default();
        // 12-byte salts are rejected by AES-CBC
        let cipher = EnvelopeCipher::new(TestEnv, config.cipher, 12);
        let cache = TokenCache::new(TestEnv, config.cache_capacity().unwrap(), config.cache_ttl);
        let codec = ChatTokenCodec::with_parts(secrets, cipher, cache);
        let tuple = ChatTuple::try_new(7, 9, 123).unwrap();

        assert_eq!(codec.encrypt(&tuple), Ok(None));
        assert_eq!(codec.encrypt_rotated(&tuple), Ok(None));
        assert!(codec.cache().is_empty());
    }
}
