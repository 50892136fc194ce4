//! Property-based tests for identity tuples and token codecs.
//!
//! These properties must hold for every identity in the safe integer range
//! and every 32-bit seed.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use base64::Engine;
use chatonym_core::{
    ChatTuple, SecretBundle, SecretContext, StartTuple, TokenConfig, TokenError, TokenSuite,
    env::Environment,
    tuple::{MAX_SAFE_INTEGER, MIN_SAFE_INTEGER},
};
use chatonym_crypto::BASE64URL;
use proptest::prelude::*;

#[derive(Clone, Default)]
struct TestEnv {
    counter: Arc<AtomicU64>,
}

impl Environment for TestEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        Duration::ZERO
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for byte in buffer.iter_mut() {
            *byte = self.counter.fetch_add(1, Ordering::SeqCst) as u8;
        }
    }
}

fn suite() -> TokenSuite<TestEnv> {
    let bundle = SecretBundle {
        start_secret: BASE64URL.encode([0x0A; 32]),
        chat_secret: BASE64URL.encode([0x0B; 32]),
        nick_pepper: "nick".to_string(),
        chat_hash_pepper: "hash".to_string(),
    };
    let secrets = Arc::new(SecretContext::new(bundle).unwrap());
    TokenSuite::new(secrets, &TokenConfig::default(), TestEnv::default()).unwrap()
}

fn safe_id() -> impl Strategy<Value = i64> {
    MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER
}

fn chat_tuple() -> impl Strategy<Value = ChatTuple> {
    (safe_id(), safe_id(), any::<u32>()).prop_map(|(sender_id, recipient_id, seed)| ChatTuple {
        recipient_id,
        seed,
        sender_id,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: start tuples survive their 12-byte encoding
    #[test]
    fn prop_start_tuple_roundtrip(recipient_id in safe_id(), seed in any::<u32>()) {
        let tuple = StartTuple { recipient_id, seed };
        let bytes = tuple.serialize()?;
        prop_assert_eq!(StartTuple::deserialize(&bytes)?, tuple);
    }

    /// Property: chat tuples survive their 20-byte encoding
    #[test]
    fn prop_chat_tuple_roundtrip(tuple in chat_tuple()) {
        let bytes = tuple.serialize()?;
        prop_assert_eq!(bytes.len(), ChatTuple::SIZE);
        prop_assert_eq!(ChatTuple::deserialize(&bytes)?, tuple);
    }

    /// Property: identities outside the safe range never encode
    #[test]
    fn prop_unsafe_recipient_rejected(
        recipient_id in prop_oneof![(MAX_SAFE_INTEGER + 1)..=i64::MAX, i64::MIN..MIN_SAFE_INTEGER],
        seed in any::<u32>(),
    ) {
        let result = StartTuple { recipient_id, seed }.serialize();
        let is_unsafe = matches!(result, Err(TokenError::UnsafeInteger { .. }));
        prop_assert!(is_unsafe);
    }

    /// Property: seeds outside u32 are rejected at construction
    #[test]
    fn prop_seed_out_of_range_rejected(
        seed in prop_oneof![i64::MIN..0, (i64::from(u32::MAX) + 1)..=i64::MAX],
    ) {
        prop_assert_eq!(StartTuple::try_new(1, seed), Err(TokenError::SeedOutOfRange(seed)));
    }

    /// Property: decrypt(encrypt(recipient)) recovers the recipient
    #[test]
    fn prop_start_token_roundtrip(recipient_id in safe_id()) {
        let suite = suite();
        let token = suite.start().encrypt(recipient_id)?.ok_or_else(|| {
            TestCaseError::fail("encrypt failed")
        })?;
        let decrypted = suite.start().decrypt(&token)?;
        prop_assert_eq!(decrypted.map(|d| d.tuple.recipient_id), Some(recipient_id));
    }

    /// Property: the rotated token opens to the swapped tuple
    #[test]
    fn prop_rotation_swaps(tuple in chat_tuple()) {
        let suite = suite();
        let token = suite.chat().encrypt_rotated(&tuple)?.ok_or_else(|| {
            TestCaseError::fail("encrypt failed")
        })?;
        let decrypted = suite.chat().decrypt(&token)?;
        prop_assert_eq!(decrypted.map(|d| d.tuple), Some(tuple.rotated()));
    }

    /// Property: fingerprints ignore which party is the sender
    #[test]
    fn prop_fingerprint_symmetric(tuple in chat_tuple()) {
        let suite = suite();
        prop_assert_eq!(
            suite.fingerprinter().fingerprint(&tuple),
            suite.fingerprinter().fingerprint(&tuple.rotated())
        );
    }

    /// Property: a pseudonym always has the `words#TAG` shape
    #[test]
    fn prop_pseudonym_shape(tuple in chat_tuple()) {
        let suite = suite();
        let name = suite.pseudonyms().pseudonym(&tuple);
        let (words, tag) = name.split_once('#').ok_or_else(|| TestCaseError::fail("no tag"))?;

        prop_assert!(!words.is_empty());
        prop_assert!((1..=4).contains(&tag.len()));
        prop_assert!(tag.chars().all(|c| c.is_ascii_digit() || ('A'..='V').contains(&c)));
    }
}
