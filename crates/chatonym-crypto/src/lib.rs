//! Chatonym Cryptographic Primitives
//!
//! Building blocks for Chatonym's opaque tokens. Pure functions with
//! deterministic outputs: callers provide salts, so every operation can be
//! reproduced in tests.
//!
//! # Token Envelope
//!
//! A token is the salt followed by the CBC ciphertext of a fixed-width
//! identity tuple, encoded as unpadded base64url:
//!
//! ```text
//! tuple bytes
//!        │
//!        ▼
//! AES-CBC (key, IV = salt) + PKCS#7
//!        │
//!        ▼
//! salt ⧺ ciphertext
//!        │
//!        ▼
//! base64url → token
//! ```
//!
//! # Security
//!
//! Confidentiality only:
//! - The envelope carries no authentication tag
//! - A modified token may decrypt to garbage instead of being rejected
//! - Structural validation of the decrypted bytes is the caller's job
//!
//! One-way hashing:
//! - [`HashAlgorithm`] selects a SHA-2 function for peppered fingerprints
//! - [`hash_n_bytes`] stretches or truncates a digest to a fixed length

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod digest;
mod envelope;
mod error;

pub use cipher::CipherAlgorithm;
pub use digest::{HashAlgorithm, hash_n_bytes};
pub use envelope::{BASE64URL, Opened, open, seal};
pub use error::EnvelopeError;
