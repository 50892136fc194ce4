//! Fuzz target for opening tokens
//!
//! Feeds arbitrary strings and raw envelopes to both codecs. Tokens come
//! straight from user-supplied links, so:
//! - Invalid base64url must be absorbed as `None`
//! - Short or unaligned envelopes must be absorbed as `None`
//! - Garbage plaintexts must surface as a `TokenError`, never a panic

#![no_main]

use std::{sync::Arc, time::Duration};

use arbitrary::Arbitrary;
use chatonym_core::{
    ChatTuple, Environment, SecretBundle, SecretContext, TokenConfig, TokenError, TokenSuite,
};
use libfuzzer_sys::fuzz_target;

#[derive(Clone)]
struct FuzzEnv;

impl Environment for FuzzEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        buffer.fill(0x42);
    }
}

#[derive(Debug, Arbitrary)]
enum Input {
    /// Arbitrary text as a token
    Text(String),
    /// Arbitrary bytes sealed as a real envelope under the chat key
    Sealed(Vec<u8>),
}

fuzz_target!(|input: Input| {
    let bundle = SecretBundle {
        start_secret: "AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE".to_string(),
        chat_secret: "AgICAgICAgICAgICAgICAgICAgICAgICAgICAgICAgI".to_string(),
        nick_pepper: "nick".to_string(),
        chat_hash_pepper: "hash".to_string(),
    };
    let secrets = Arc::new(SecretContext::new(bundle).unwrap());
    let suite = TokenSuite::new(Arc::clone(&secrets), &TokenConfig::default(), FuzzEnv).unwrap();

    match input {
        Input::Text(token) => {
            let _ = suite.start().decrypt(&token);
            let _ = suite.chat().decrypt(&token);
        },
        Input::Sealed(plaintext) => {
            let token = chatonym_crypto::seal(
                chatonym_crypto::CipherAlgorithm::Aes256Cbc,
                secrets.chat_key(),
                &[0u8; 16],
                &plaintext,
            )
            .unwrap();

            match suite.chat().decrypt(&token) {
                Ok(Some(_)) | Err(TokenError::UnsafeInteger { .. }) => {
                    assert_eq!(plaintext.len(), ChatTuple::SIZE);
                },
                Err(_) => assert_ne!(plaintext.len(), ChatTuple::SIZE),
                Ok(None) => panic!("valid envelope was not opened"),
            }
        },
    }
});
