//! All token components wired to one secret context.

use std::sync::Arc;

use crate::{
    chat_token::ChatTokenCodec,
    config::TokenConfig,
    env::Environment,
    error::ConfigError,
    fingerprint::Fingerprinter,
    pseudonym::PseudonymGenerator,
    secrets::SecretContext,
    start_token::StartTokenCodec,
};

/// The two codecs, the fingerprinter and the pseudonym generator, sharing
/// one [`SecretContext`] and one [`TokenConfig`].
pub struct TokenSuite<E: Environment> {
    start: StartTokenCodec<E>,
    chat: ChatTokenCodec<E>,
    fingerprinter: Fingerprinter,
    pseudonyms: PseudonymGenerator,
}

impl<E: Environment> TokenSuite<E> {
    /// Build every component from `secrets` and `config`.
    ///
    /// # Errors
    ///
    /// Any [`TokenConfig::validate`] failure.
    pub fn new(
        secrets: Arc<SecretContext>,
        config: &TokenConfig,
        env: E,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            start: StartTokenCodec::new(Arc::clone(&secrets), config, env.clone())?,
            chat: ChatTokenCodec::new(Arc::clone(&secrets), config, env)?,
            fingerprinter: Fingerprinter::new(Arc::clone(&secrets), config.hash),
            pseudonyms: PseudonymGenerator::new(secrets, config.hash),
        })
    }

    /// Start token codec.
    pub fn start(&self) -> &StartTokenCodec<E> {
        &self.start
    }

    /// Chat token codec.
    pub fn chat(&self) -> &ChatTokenCodec<E> {
        &self.chat
    }

    /// Conversation fingerprints.
    pub fn fingerprinter(&self) -> &Fingerprinter {
        &self.fingerprinter
    }

    /// Pseudonym generator.
    pub fn pseudonyms(&self) -> &PseudonymGenerator {
        &self.pseudonyms
    }
}
