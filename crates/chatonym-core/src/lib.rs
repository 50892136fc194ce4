//! Chatonym Token Protocol
//!
//! Two people talk through a relay that never stores who is talking to
//! whom. Identities travel inside encrypted tokens held by the users
//! themselves; the relay keeps only one-way fingerprints of terminated
//! conversations.
//!
//! # Flow
//!
//! ```text
//! inviter ──invite──► StartTokenCodec ──► start token (recipient, seed)
//!                                              │
//! opener ──opens link──► decrypt + opener id ──┘
//!                              │
//!                              ▼
//!                ChatTuple (sender, recipient, seed)
//!                 │              │              │
//!                 ▼              ▼              ▼
//!           Fingerprinter  ChatTokenCodec  PseudonymGenerator
//!          (ledger check)  (reply token)   (display name)
//! ```
//!
//! # Error tiers
//!
//! - Validation problems in tuple data are returned as [`TokenError`]
//! - Undecryptable tokens are `Ok(None)`, logged at the envelope boundary
//! - Secret and configuration problems are [`SecretError`] and
//!   [`ConfigError`], meant to stop startup
//!
//! All components are synchronous and share one immutable
//! [`SecretContext`]. Time and randomness come from an [`Environment`] so
//! tests can pin seeds, salts and cache expiry.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cache;
pub mod chat_token;
pub mod config;
pub mod env;
pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod pseudonym;
pub mod secrets;
pub mod start_token;
pub mod suite;
pub mod tuple;

pub use cache::TokenCache;
pub use chat_token::ChatTokenCodec;
pub use config::TokenConfig;
pub use env::Environment;
pub use envelope::EnvelopeCipher;
pub use error::{ConfigError, IdField, SecretError, TokenError};
pub use fingerprint::{Fingerprint, Fingerprinter};
pub use pseudonym::{PseudonymGenerator, WordLists};
pub use secrets::{SecretBundle, SecretContext, SecretName};
pub use start_token::StartTokenCodec;
pub use suite::TokenSuite;
pub use tuple::{ChatTuple, Decrypted, StartTuple};
