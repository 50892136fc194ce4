//! Direction-independent conversation fingerprints.
//!
//! The fingerprint is what the termination ledger stores. It is a peppered
//! one-way hash of the unordered identity pair and the seed, so both legs of
//! a conversation map to the same value and the ledger never learns who
//! talked to whom.

use std::{fmt, sync::Arc};

use base64::Engine;
use chatonym_crypto::{BASE64URL, HashAlgorithm};

use crate::{secrets::SecretContext, tuple::ChatTuple};

/// Opaque conversation fingerprint (base64url digest).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap a previously computed fingerprint.
    pub fn from_string(value: String) -> Self {
        Self(value)
    }

    /// The encoded digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the encoded digest.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint of `tuple` under `pepper`.
///
/// Hashes the decimal string `pepper ⧺ min(ids) ⧺ max(ids) ⧺ seed`.
pub fn fingerprint_with_pepper(
    hash: HashAlgorithm,
    pepper: &str,
    tuple: &ChatTuple,
) -> Fingerprint {
    let low = tuple.sender_id.min(tuple.recipient_id);
    let high = tuple.sender_id.max(tuple.recipient_id);

    let input = format!("{pepper}{low}{high}{}", tuple.seed);
    Fingerprint(BASE64URL.encode(hash.digest(input.as_bytes())))
}

/// Computes fingerprints with the bundle's `chatHashPepper`.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    secrets: Arc<SecretContext>,
    hash: HashAlgorithm,
}

impl Fingerprinter {
    /// Create a fingerprinter using `hash`.
    pub fn new(secrets: Arc<SecretContext>, hash: HashAlgorithm) -> Self {
        Self { secrets, hash }
    }

    /// Fingerprint of the conversation `tuple` belongs to.
    pub fn fingerprint(&self, tuple: &ChatTuple) -> Fingerprint {
        fingerprint_with_pepper(self.hash, self.secrets.chat_hash_pepper(), tuple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(sender: i64, recipient: i64, seed: i64) -> ChatTuple {
        ChatTuple::try_new(sender, recipient, seed).unwrap()
    }

    #[test]
    fn symmetric_in_direction() {
        let forward = fingerprint_with_pepper(HashAlgorithm::Sha256, "p", &tuple(7, 9, 123));
        let backward = fingerprint_with_pepper(HashAlgorithm::Sha256, "p", &tuple(9, 7, 123));

        assert_eq!(forward, backward);
    }

    #[test]
    fn matches_digest_of_ordered_string() {
        let fingerprint = fingerprint_with_pepper(HashAlgorithm::Sha256, "pep", &tuple(9, 7, 123));
        let expected = BASE64URL.encode(HashAlgorithm::Sha256.digest(b"pep79123"));

        assert_eq!(fingerprint.as_str(), expected);
    }

    #[test]
    fn pepper_changes_fingerprint() {
        let t = tuple(1, 2, 3);
        assert_ne!(
            fingerprint_with_pepper(HashAlgorithm::Sha256, "a", &t),
            fingerprint_with_pepper(HashAlgorithm::Sha256, "b", &t)
        );
    }

    #[test]
    fn sha256_fingerprint_length() {
        let fingerprint = fingerprint_with_pepper(HashAlgorithm::Sha256, "p", &tuple(1, 2, 3));

        // 32 bytes unpadded base64url
        assert_eq!(fingerprint.as_str().len(), 43);
    }
}
