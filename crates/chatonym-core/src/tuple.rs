//! Identity tuples and their fixed-width wire encoding.
//!
//! All multi-byte integers are Big Endian:
//!
//! ```text
//! StartTuple (12 bytes)
//!   bytes 0-7   recipient_id  i64
//!   bytes 8-11  seed          u32
//!
//! ChatTuple (20 bytes)
//!   bytes 0-11  StartTuple { recipient_id, seed }
//!   bytes 12-19 sender_id     i64
//! ```
//!
//! Identities are restricted to the safe integer range (±(2^53 - 1)) so that
//! tokens stay interchangeable with clients whose numbers are IEEE doubles.
//! Ranges are validated before encoding and after decoding.

use crate::error::{IdField, TokenError};

/// Largest identity that survives a round trip through an IEEE double.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Smallest identity that survives a round trip through an IEEE double.
pub const MIN_SAFE_INTEGER: i64 = -MAX_SAFE_INTEGER;

/// Returns true if `value` is within the safe integer range.
pub fn is_safe_integer(value: i64) -> bool {
    (MIN_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value)
}

fn check_id(field: IdField, value: i64) -> Result<i64, TokenError> {
    if is_safe_integer(value) { Ok(value) } else { Err(TokenError::UnsafeInteger { field, value }) }
}

fn check_seed(seed: i64) -> Result<u32, TokenError> {
    u32::try_from(seed).map_err(|_| TokenError::SeedOutOfRange(seed))
}

fn read_i64(bytes: &[u8], offset: usize) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    i64::from_be_bytes(buf)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_be_bytes(buf)
}

/// A pending invitation addressed to `recipient_id`, distinguished by `seed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartTuple {
    /// The user who requested the invitation link
    pub recipient_id: i64,
    /// Random discriminator for this invitation
    pub seed: u32,
}

impl StartTuple {
    /// Size of the serialized tuple (12 bytes)
    pub const SIZE: usize = 12;

    /// Build a tuple from wide integers, validating both ranges.
    ///
    /// # Errors
    ///
    /// - `UnsafeInteger`: `recipient_id` is outside the safe integer range
    /// - `SeedOutOfRange`: `seed` is not in `[0, 2^32 - 1]`
    pub fn try_new(recipient_id: i64, seed: i64) -> Result<Self, TokenError> {
        Ok(Self { recipient_id: check_id(IdField::Recipient, recipient_id)?, seed: check_seed(seed)? })
    }

    /// Encode as 12 Big Endian bytes.
    ///
    /// # Errors
    ///
    /// - `UnsafeInteger`: `recipient_id` is outside the safe integer range
    pub fn serialize(&self) -> Result<[u8; Self::SIZE], TokenError> {
        let recipient_id = check_id(IdField::Recipient, self.recipient_id)?;

        let mut bytes = [0u8; Self::SIZE];
        bytes[0..8].copy_from_slice(&recipient_id.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.seed.to_be_bytes());

        Ok(bytes)
    }

    /// Decode from the first 12 bytes of `bytes`.
    ///
    /// Trailing bytes are ignored, which lets [`ChatTuple`] reuse this for its
    /// prefix.
    ///
    /// # Errors
    ///
    /// - `TooShort`: fewer than 12 bytes
    /// - `UnsafeInteger`: decoded `recipient_id` is outside the safe range
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.len() < Self::SIZE {
            return Err(TokenError::TooShort { min: Self::SIZE, actual: bytes.len() });
        }

        let recipient_id = check_id(IdField::Recipient, read_i64(bytes, 0))?;
        let seed = read_u32(bytes, 8);

        Ok(Self { recipient_id, seed })
    }

    /// Complete the invitation into a chat leg sent by `sender_id`.
    pub fn with_sender(self, sender_id: i64) -> ChatTuple {
        ChatTuple { recipient_id: self.recipient_id, seed: self.seed, sender_id }
    }
}

/// One directed leg of a two-party conversation.
///
/// The two legs of a conversation have `sender_id` and `recipient_id`
/// swapped and share the same `seed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatTuple {
    /// The party this leg delivers to
    pub recipient_id: i64,
    /// The conversation's discriminator, inherited from the invitation
    pub seed: u32,
    /// The party this leg delivers from
    pub sender_id: i64,
}

impl ChatTuple {
    /// Size of the serialized tuple (20 bytes)
    pub const SIZE: usize = 20;

    /// Build a tuple from wide integers, validating every range.
    ///
    /// # Errors
    ///
    /// - `UnsafeInteger`: an identity is outside the safe integer range
    /// - `SeedOutOfRange`: `seed` is not in `[0, 2^32 - 1]`
    pub fn try_new(sender_id: i64, recipient_id: i64, seed: i64) -> Result<Self, TokenError> {
        let start = StartTuple::try_new(recipient_id, seed)?;
        Ok(start.with_sender(check_id(IdField::Sender, sender_id)?))
    }

    /// The invitation part of this leg.
    pub fn start(&self) -> StartTuple {
        StartTuple { recipient_id: self.recipient_id, seed: self.seed }
    }

    /// The counterpart leg: sender and recipient swapped, same seed.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self { recipient_id: self.sender_id, seed: self.seed, sender_id: self.recipient_id }
    }

    /// Composite idempotency key: `sender#recipient#seed`.
    pub fn cache_key(&self) -> String {
        format!("{}#{}#{}", self.sender_id, self.recipient_id, self.seed)
    }

    /// Encode as 20 Big Endian bytes.
    ///
    /// # Errors
    ///
    /// - `UnsafeInteger`: an identity is outside the safe integer range
    pub fn serialize(&self) -> Result<[u8; Self::SIZE], TokenError> {
        let start = self.start().serialize()?;
        let sender_id = check_id(IdField::Sender, self.sender_id)?;

        let mut bytes = [0u8; Self::SIZE];
        bytes[0..12].copy_from_slice(&start);
        bytes[12..20].copy_from_slice(&sender_id.to_be_bytes());

        Ok(bytes)
    }

    /// Decode from exactly 20 bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidLength`: not exactly 20 bytes
    /// - `UnsafeInteger`: a decoded identity is outside the safe range
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.len() != Self::SIZE {
            return Err(TokenError::InvalidLength { expected: Self::SIZE, actual: bytes.len() });
        }

        let start = StartTuple::deserialize(bytes)?;
        let sender_id = check_id(IdField::Sender, read_i64(bytes, 12))?;

        Ok(start.with_sender(sender_id))
    }
}

/// A tuple recovered from a token, with the token's salt for provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrypted<T> {
    /// The decoded tuple
    pub tuple: T,
    /// The token's salt, base64url encoded (informational only)
    pub salt: String,
}
