//! Block cipher selection for the token envelope.

use std::{fmt, str::FromStr};

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use crate::error::EnvelopeError;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Symmetric cipher used to seal tokens.
///
/// All variants are AES in CBC mode with PKCS#7 padding, so the IV is always
/// one 16-byte block. Names follow the `openssl` convention
/// (`aes-256-cbc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CipherAlgorithm {
    /// AES-128 in CBC mode (16-byte key)
    Aes128Cbc,
    /// AES-192 in CBC mode (24-byte key)
    Aes192Cbc,
    /// AES-256 in CBC mode (32-byte key)
    #[default]
    Aes256Cbc,
}

impl CipherAlgorithm {
    /// Cipher block size in bytes (also the IV size)
    pub const BLOCK_SIZE: usize = 16;

    /// Canonical algorithm name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aes128Cbc => "aes-128-cbc",
            Self::Aes192Cbc => "aes-192-cbc",
            Self::Aes256Cbc => "aes-256-cbc",
        }
    }

    /// Required key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Self::Aes128Cbc => 16,
            Self::Aes192Cbc => 24,
            Self::Aes256Cbc => 32,
        }
    }

    /// Required IV length in bytes.
    pub fn iv_len(self) -> usize {
        Self::BLOCK_SIZE
    }

    /// Ciphertext length for a plaintext of `plaintext_len` bytes.
    ///
    /// PKCS#7 always adds at least one byte of padding.
    pub fn ciphertext_len(self, plaintext_len: usize) -> usize {
        (plaintext_len / Self::BLOCK_SIZE + 1) * Self::BLOCK_SIZE
    }

    /// Encrypt `plaintext` under `key` with the given IV.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: key does not match [`Self::key_len`]
    /// - `InvalidSaltLength`: IV does not match [`Self::iv_len`]
    pub fn encrypt(self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        self.check_lengths(key, iv)?;

        let ciphertext = match self {
            Self::Aes128Cbc => Aes128CbcEnc::new_from_slices(key, iv)
                .map_err(|_| self.key_error(key))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            Self::Aes192Cbc => Aes192CbcEnc::new_from_slices(key, iv)
                .map_err(|_| self.key_error(key))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            Self::Aes256Cbc => Aes256CbcEnc::new_from_slices(key, iv)
                .map_err(|_| self.key_error(key))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        };

        debug_assert_eq!(ciphertext.len(), self.ciphertext_len(plaintext.len()));

        Ok(ciphertext)
    }

    /// Decrypt `ciphertext` under `key` with the given IV.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` / `InvalidSaltLength`: as for [`Self::encrypt`]
    /// - `Truncated`: ciphertext is empty or not block aligned
    /// - `BadPadding`: padding check failed (wrong key or corrupted data)
    pub fn decrypt(self, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        self.check_lengths(key, iv)?;

        if ciphertext.is_empty() || ciphertext.len() % Self::BLOCK_SIZE != 0 {
            return Err(EnvelopeError::Truncated { len: ciphertext.len() });
        }

        let plaintext = match self {
            Self::Aes128Cbc => Aes128CbcDec::new_from_slices(key, iv)
                .map_err(|_| self.key_error(key))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::Aes192Cbc => Aes192CbcDec::new_from_slices(key, iv)
                .map_err(|_| self.key_error(key))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            Self::Aes256Cbc => Aes256CbcDec::new_from_slices(key, iv)
                .map_err(|_| self.key_error(key))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };

        plaintext.map_err(|_| EnvelopeError::BadPadding)
    }

    fn check_lengths(self, key: &[u8], iv: &[u8]) -> Result<(), EnvelopeError> {
        if key.len() != self.key_len() {
            return Err(self.key_error(key));
        }
        if iv.len() != self.iv_len() {
            return Err(EnvelopeError::InvalidSaltLength {
                expected: self.iv_len(),
                actual: iv.len(),
            });
        }
        Ok(())
    }

    fn key_error(self, key: &[u8]) -> EnvelopeError {
        EnvelopeError::InvalidKeyLength { expected: self.key_len(), actual: key.len() }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherAlgorithm {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-128-cbc" => Ok(Self::Aes128Cbc),
            "aes-192-cbc" => Ok(Self::Aes192Cbc),
            "aes-256-cbc" => Ok(Self::Aes256Cbc),
            other => Err(EnvelopeError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}
