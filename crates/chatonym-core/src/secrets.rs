//! Secret bundle and the immutable context built from it.
//!
//! The bundle holds four base64url strings: two encryption keys and two
//! hash peppers. It is generated once, persisted as an opaque blob (JSON,
//! then base64url), and loaded at startup into a [`SecretContext`] that
//! every codec shares read-only.

use std::{fmt, str::FromStr};

use base64::Engine;
use chatonym_crypto::BASE64URL;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{env::Environment, error::SecretError};

/// Name of a secret in the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretName {
    /// Key for start tokens
    StartSecret,
    /// Key for chat tokens
    ChatSecret,
    /// Pepper for pseudonyms
    NickPepper,
    /// Pepper for conversation fingerprints
    ChatHashPepper,
}

impl SecretName {
    /// All secret names, in bundle order.
    pub const ALL: [Self; 4] =
        [Self::StartSecret, Self::ChatSecret, Self::NickPepper, Self::ChatHashPepper];

    /// Name as stored in the bundle blob.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartSecret => "startSecret",
            Self::ChatSecret => "chatSecret",
            Self::NickPepper => "nickPepper",
            Self::ChatHashPepper => "chatHashPepper",
        }
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown secret name: {s}"))
    }
}

/// The long-lived secret material, as persisted.
///
/// Fields are base64url strings. Missing fields deserialize as empty and are
/// reported by [`SecretBundle::get`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SecretBundle {
    /// Start token key (base64url)
    #[serde(default)]
    pub start_secret: String,
    /// Chat token key (base64url)
    #[serde(default)]
    pub chat_secret: String,
    /// Pseudonym pepper
    #[serde(default)]
    pub nick_pepper: String,
    /// Fingerprint pepper
    #[serde(default)]
    pub chat_hash_pepper: String,
}

impl SecretBundle {
    /// Generate a fresh bundle from the environment's secure randomness.
    pub fn generate<E: Environment>(env: &E, secret_bytes: usize, pepper_bytes: usize) -> Self {
        Self {
            start_secret: random_base64url(env, secret_bytes),
            chat_secret: random_base64url(env, secret_bytes),
            nick_pepper: random_base64url(env, pepper_bytes),
            chat_hash_pepper: random_base64url(env, pepper_bytes),
        }
    }

    /// Read a secret by name.
    ///
    /// # Errors
    ///
    /// - `Missing`: the secret is absent or empty
    pub fn get(&self, name: SecretName) -> Result<&str, SecretError> {
        let value = match name {
            SecretName::StartSecret => &self.start_secret,
            SecretName::ChatSecret => &self.chat_secret,
            SecretName::NickPepper => &self.nick_pepper,
            SecretName::ChatHashPepper => &self.chat_hash_pepper,
        };

        if value.is_empty() {
            return Err(SecretError::Missing(name));
        }
        Ok(value)
    }

    /// Encode as the opaque blob stored in the database (base64url JSON).
    pub fn encode(&self) -> Result<String, SecretError> {
        let json = Zeroizing::new(
            serde_json::to_vec(self).map_err(|e| SecretError::Blob(e.to_string()))?,
        );
        Ok(BASE64URL.encode(json.as_slice()))
    }

    /// Decode a blob produced by [`SecretBundle::encode`].
    pub fn decode(blob: &str) -> Result<Self, SecretError> {
        let json = Zeroizing::new(
            BASE64URL.decode(blob.trim()).map_err(|e| SecretError::Blob(e.to_string()))?,
        );
        serde_json::from_slice(&json).map_err(|e| SecretError::Blob(e.to_string()))
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle").finish_non_exhaustive()
    }
}

fn random_base64url<E: Environment>(env: &E, len: usize) -> String {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    env.random_bytes(&mut bytes);
    BASE64URL.encode(bytes.as_slice())
}

/// Immutable secret context shared by every codec.
///
/// Built once from a [`SecretBundle`]. Cipher keys are decoded here, at
/// construction, so codecs never touch the encoded strings again.
pub struct SecretContext {
    bundle: SecretBundle,
    start_key: Zeroizing<Vec<u8>>,
    chat_key: Zeroizing<Vec<u8>>,
}

impl SecretContext {
    /// Build the context, decoding both keys.
    ///
    /// # Errors
    ///
    /// - `Missing`: any of the four secrets is absent or empty
    /// - `InvalidEncoding`: a key is not base64url
    pub fn new(bundle: SecretBundle) -> Result<Self, SecretError> {
        for name in SecretName::ALL {
            bundle.get(name)?;
        }

        let start_key = decode_key(&bundle, SecretName::StartSecret)?;
        let chat_key = decode_key(&bundle, SecretName::ChatSecret)?;

        Ok(Self { bundle, start_key, chat_key })
    }

    /// Read a secret by name.
    pub fn get(&self, name: SecretName) -> Result<&str, SecretError> {
        self.bundle.get(name)
    }

    /// Raw key for start tokens.
    pub fn start_key(&self) -> &[u8] {
        &self.start_key
    }

    /// Raw key for chat tokens.
    pub fn chat_key(&self) -> &[u8] {
        &self.chat_key
    }

    /// Pepper for pseudonyms.
    pub fn nick_pepper(&self) -> &str {
        &self.bundle.nick_pepper
    }

    /// Pepper for conversation fingerprints.
    pub fn chat_hash_pepper(&self) -> &str {
        &self.bundle.chat_hash_pepper
    }

    /// The bundle this context was built from.
    pub fn bundle(&self) -> &SecretBundle {
        &self.bundle
    }
}

impl fmt::Debug for SecretContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretContext")
            .field("start_key_len", &self.start_key.len())
            .field("chat_key_len", &self.chat_key.len())
            .finish_non_exhaustive()
    }
}

fn decode_key(bundle: &SecretBundle, name: SecretName) -> Result<Zeroizing<Vec<u8>>, SecretError> {
    let encoded = bundle.get(name)?;
    BASE64URL
        .decode(encoded)
        .map(Zeroizing::new)
        .map_err(|e| SecretError::InvalidEncoding { name, reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[derive(Clone)]
    struct TestEnv;

    impl Environment for TestEnv {
        type Instant = Duration;

        fn now(&self) -> Duration {
            Duration::ZERO
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = i as u8;
            }
        }
    }

    fn test_bundle() -> SecretBundle {
        SecretBundle {
            start_secret: BASE64URL.encode([0x01; 32]),
            chat_secret: BASE64URL.encode([0x02; 32]),
            nick_pepper: "nick-pepper".to_string(),
            chat_hash_pepper: "hash-pepper".to_string(),
        }
    }

    #[test]
    fn generate_uses_configured_lengths() {
        let bundle = SecretBundle::generate(&TestEnv, 32, 24);

        assert_eq!(BASE64URL.decode(&bundle.start_secret).unwrap().len(), 32);
        assert_eq!(BASE64URL.decode(&bundle.chat_secret).unwrap().len(), 32);
        assert_eq!(BASE64URL.decode(&bundle.nick_pepper).unwrap().len(), 24);
        assert_eq!(BASE64URL.decode(&bundle.chat_hash_pepper).unwrap().len(), 24);
    }

    #[test]
    fn blob_roundtrip() {
        let bundle = test_bundle();
        let blob = bundle.encode().unwrap();

        assert_eq!(SecretBundle::decode(&blob).unwrap(), bundle);
    }

    #[test]
    fn blob_uses_camel_case_names() {
        let blob = test_bundle().encode().unwrap();
        let json = String::from_utf8(BASE64URL.decode(blob).unwrap()).unwrap();

        for name in SecretName::ALL {
            assert!(json.contains(name.as_str()), "missing {name} in {json}");
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(SecretBundle::decode("!!!"), Err(SecretError::Blob(_))));
        assert!(matches!(
            SecretBundle::decode(&BASE64URL.encode(b"not json")),
            Err(SecretError::Blob(_))
        ));
    }

    #[test]
    fn missing_field_reported_on_get() {
        let blob = BASE64URL.encode(br#"{"startSecret":"AQ","chatSecret":"Ag"}"#);
        let bundle = SecretBundle::decode(&blob).unwrap();

        assert_eq!(bundle.get(SecretName::StartSecret).unwrap(), "AQ");
        assert_eq!(
            bundle.get(SecretName::NickPepper),
            Err(SecretError::Missing(SecretName::NickPepper))
        );
    }

    #[test]
    fn context_decodes_keys() {
        let context = SecretContext::new(test_bundle()).unwrap();

        assert_eq!(context.start_key(), &[0x01; 32]);
        assert_eq!(context.chat_key(), &[0x02; 32]);
        assert_eq!(context.nick_pepper(), "nick-pepper");
        assert_eq!(context.chat_hash_pepper(), "hash-pepper");
    }

    #[test]
    fn context_keeps_the_loaded_bundle() {
        let bundle = test_bundle();
        let context = SecretContext::new(bundle.clone()).unwrap();

        assert_eq!(context.bundle(), &bundle);
        assert_eq!(context.bundle().encode().unwrap(), bundle.encode().unwrap());
    }

    #[test]
    fn context_requires_every_secret() {
        let mut bundle = test_bundle();
        bundle.chat_hash_pepper.clear();

        let result = SecretContext::new(bundle);
        assert!(matches!(result, Err(SecretError::Missing(SecretName::ChatHashPepper))));
    }

    #[test]
    fn context_rejects_invalid_key_encoding() {
        let mut bundle = test_bundle();
        bundle.start_secret = "not*base64".to_string();

        let result = SecretContext::new(bundle);
        assert!(matches!(
            result,
            Err(SecretError::InvalidEncoding { name: SecretName::StartSecret, .. })
        ));
    }

    #[test]
    fn debug_does_not_leak_secrets() {
        let bundle = test_bundle();
        let rendered = format!("{bundle:?}");

        assert!(!rendered.contains("nick-pepper"));
        assert!(!rendered.contains(&bundle.start_secret));
    }

    #[test]
    fn secret_name_parse() {
        assert_eq!("chatSecret".parse::<SecretName>().unwrap(), SecretName::ChatSecret);
        assert!("chat_secret".parse::<SecretName>().is_err());
    }
}
