//! Salted CBC envelope encoded as base64url
//!
//! All functions are pure - the salt must be provided by the caller when
//! sealing. The salt doubles as the CBC IV and travels in front of the
//! ciphertext.

use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::{cipher::CipherAlgorithm, error::EnvelopeError};

/// Unpadded URL-safe base64 that also accepts padded input when decoding.
pub const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Result of opening an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    /// Decrypted bytes
    pub plaintext: Vec<u8>,
    /// The envelope's salt, base64url encoded
    ///
    /// Informational only. It identifies which issuance a token came from
    /// and is not checked against anything.
    pub salt: String,
}

/// Seal `plaintext` into a token string.
///
/// Layout before encoding: `salt ⧺ ciphertext`.
///
/// # Errors
///
/// - `InvalidKeyLength`: key does not fit the algorithm
/// - `InvalidSaltLength`: salt is not one cipher block
pub fn seal(
    algorithm: CipherAlgorithm,
    key: &[u8],
    salt: &[u8],
    plaintext: &[u8],
) -> Result<String, EnvelopeError> {
    let ciphertext = algorithm.encrypt(key, salt, plaintext)?;

    let mut token = Vec::with_capacity(salt.len() + ciphertext.len());
    token.extend_from_slice(salt);
    token.extend_from_slice(&ciphertext);

    Ok(BASE64URL.encode(token))
}

/// Open a token string produced by [`seal`].
///
/// `salt_len` must be the salt length used when sealing.
///
/// # Errors
///
/// - `Malformed`: token is not base64url
/// - `Truncated`: token is shorter than the salt or not block aligned
/// - `BadPadding`: wrong key or corrupted ciphertext
/// - `InvalidKeyLength` / `InvalidSaltLength`: configuration mismatch
pub fn open(
    algorithm: CipherAlgorithm,
    key: &[u8],
    salt_len: usize,
    token: &str,
) -> Result<Opened, EnvelopeError> {
    let bytes = BASE64URL
        .decode(token.trim())
        .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

    if bytes.len() <= salt_len {
        return Err(EnvelopeError::Truncated { len: bytes.len() });
    }

    let (salt, ciphertext) = bytes.split_at(salt_len);
    let plaintext = algorithm.decrypt(key, salt, ciphertext)?;

    Ok(Opened { plaintext, salt: BASE64URL.encode(salt) })
}
