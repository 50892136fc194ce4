//! Deterministic display names.
//!
//! A pseudonym looks like `SwiftOtter#1F3`: a prefix word, a suffix word and
//! a base-32 tag, all picked from a peppered hash of one directed leg of a
//! conversation. The hash input is not order-normalized, so each party sees
//! a different name for the other.
//!
//! Pseudonyms are cosmetic. With finite word lists and a 16-bit tag,
//! unrelated conversations can share a name; nothing should rely on a
//! pseudonym being unique or unguessable.

mod words;

use std::{borrow::Cow, sync::Arc};

use chatonym_crypto::{HashAlgorithm, hash_n_bytes};

use crate::{error::ConfigError, secrets::SecretContext, tuple::ChatTuple};

/// Bytes of hash output consumed per pseudonym: three `u64` words.
pub const PSEUDONYM_HASH_BYTES: usize = 24;

/// Modulus for the numeric tag.
pub const TAG_MODULUS: u64 = 0x1_0000;

const BASE32_DIGITS: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";

/// The prefix and suffix word lists.
#[derive(Debug, Clone)]
pub struct WordLists {
    prefixes: Cow<'static, [&'static str]>,
    suffixes: Cow<'static, [&'static str]>,
}

impl Default for WordLists {
    fn default() -> Self {
        Self { prefixes: Cow::Borrowed(words::PREFIXES), suffixes: Cow::Borrowed(words::SUFFIXES) }
    }
}

impl WordLists {
    /// Custom word lists.
    ///
    /// # Errors
    ///
    /// - `EmptyWordList`: either list is empty
    pub fn new(
        prefixes: Vec<&'static str>,
        suffixes: Vec<&'static str>,
    ) -> Result<Self, ConfigError> {
        if prefixes.is_empty() || suffixes.is_empty() {
            return Err(ConfigError::EmptyWordList);
        }
        Ok(Self { prefixes: Cow::Owned(prefixes), suffixes: Cow::Owned(suffixes) })
    }

    /// Prefix word for `n`.
    pub fn prefix(&self, n: u64) -> &'static str {
        pick(&self.prefixes, n)
    }

    /// Suffix word for `n`.
    pub fn suffix(&self, n: u64) -> &'static str {
        pick(&self.suffixes, n)
    }
}

fn pick(list: &[&'static str], n: u64) -> &'static str {
    let index = (n % list.len() as u64) as usize;
    list.get(index).copied().unwrap_or_default()
}

/// Render `n mod 65536` in upper-case base 32 without padding.
pub fn base32_tag(n: u64) -> String {
    let mut value = n % TAG_MODULUS;
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(4);
    while value > 0 {
        digits.push(BASE32_DIGITS[(value % 32) as usize]);
        value /= 32;
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).into_owned()
}

/// Pseudonym for an arbitrary seed string.
pub fn nick(hash: HashAlgorithm, words: &WordLists, input: &str) -> String {
    let digest = hash_n_bytes(hash, input.as_bytes(), PSEUDONYM_HASH_BYTES);

    let mut parts = digest.chunks_exact(8).map(|chunk| {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        u64::from_be_bytes(buf)
    });
    let n1 = parts.next().unwrap_or_default();
    let n2 = parts.next().unwrap_or_default();
    let n3 = parts.next().unwrap_or_default();

    format!("{}{}#{}", words.prefix(n1), words.suffix(n2), base32_tag(n3))
}

/// Derives pseudonyms with the bundle's `nickPepper`.
#[derive(Debug, Clone)]
pub struct PseudonymGenerator {
    secrets: Arc<SecretContext>,
    hash: HashAlgorithm,
    words: WordLists,
}

impl PseudonymGenerator {
    /// Create a generator with the built-in word lists.
    pub fn new(secrets: Arc<SecretContext>, hash: HashAlgorithm) -> Self {
        Self::with_words(secrets, hash, WordLists::default())
    }

    /// Create a generator with custom word lists.
    pub fn with_words(secrets: Arc<SecretContext>, hash: HashAlgorithm, words: WordLists) -> Self {
        Self { secrets, hash, words }
    }

    /// Name under which the recipient of `tuple` sees its sender.
    pub fn pseudonym(&self, tuple: &ChatTuple) -> String {
        let input = format!(
            "{}{}{}{}",
            self.secrets.nick_pepper(),
            tuple.sender_id,
            tuple.recipient_id,
            tuple.seed
        );
        nick(self.hash, &self.words, &input)
    }

    /// Name under which the sender of `tuple` sees its recipient.
    pub fn pseudonym_for_recipient(&self, tuple: &ChatTuple) -> String {
        self.pseudonym(&tuple.rotated())
    }
}
