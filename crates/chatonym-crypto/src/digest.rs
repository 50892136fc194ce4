//! One-way hashing for fingerprints and pseudonyms

use std::{fmt, str::FromStr};

use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::error::EnvelopeError;

/// Hash function used for peppered fingerprints and pseudonym seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-224 (28-byte output)
    Sha224,
    /// SHA-256 (32-byte output)
    #[default]
    Sha256,
    /// SHA-384 (48-byte output)
    Sha384,
    /// SHA-512 (64-byte output)
    Sha512,
}

impl HashAlgorithm {
    /// Canonical algorithm name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Hash `input` in one shot.
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha224 => Sha224::digest(input).to_vec(),
            Self::Sha256 => Sha256::digest(input).to_vec(),
            Self::Sha384 => Sha384::digest(input).to_vec(),
            Self::Sha512 => Sha512::digest(input).to_vec(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha224" | "sha-224" => Ok(Self::Sha224),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha384" | "sha-384" => Ok(Self::Sha384),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            other => Err(EnvelopeError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Hash `input` to exactly `n_bytes` bytes.
///
/// The digest is repeated as many times as needed and then truncated, so
/// requesting fewer bytes than the digest length returns a prefix of it.
pub fn hash_n_bytes(algorithm: HashAlgorithm, input: &[u8], n_bytes: usize) -> Vec<u8> {
    let hash = algorithm.digest(input);
    hash.iter().copied().cycle().take(n_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_len_matches_digest() {
        for alg in [
            HashAlgorithm::Sha224,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ] {
            assert_eq!(alg.digest(b"abc").len(), alg.output_len());
        }
    }

    #[test]
    fn sha256_known_vector() {
        let hash = HashAlgorithm::Sha256.digest(b"abc");
        assert_eq!(&hash[..4], &[0xba, 0x78, 0x16, 0xbf]);
    }

    #[test]
    fn truncates_to_prefix() {
        let full = HashAlgorithm::Sha256.digest(b"input");
        let short = hash_n_bytes(HashAlgorithm::Sha256, b"input", 24);

        assert_eq!(short.len(), 24);
        assert_eq!(short, full[..24]);
    }

    #[test]
    fn repeats_digest_when_longer() {
        let full = HashAlgorithm::Sha256.digest(b"input");
        let long = hash_n_bytes(HashAlgorithm::Sha256, b"input", 80);

        assert_eq!(long.len(), 80);
        assert_eq!(long[..32], full[..]);
        assert_eq!(long[32..64], full[..]);
        assert_eq!(long[64..], full[..16]);
    }

    #[test]
    fn exact_length_is_digest() {
        let full = HashAlgorithm::Sha512.digest(b"input");
        assert_eq!(hash_n_bytes(HashAlgorithm::Sha512, b"input", 64), full);
    }

    #[test]
    fn zero_bytes_is_empty() {
        assert!(hash_n_bytes(HashAlgorithm::Sha256, b"input", 0).is_empty());
    }

    #[test]
    fn parse_names() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA-512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }
}
