//! Chatonym relay.
//!
//! Production glue around [`chatonym_core`]: durable storage for the secret
//! bundle and the termination ledger, the one-time secret store, share
//! links, and the request flow a bot runs for each incoming message.
//!
//! # Components
//!
//! - [`Storage`]: secret blob + termination ledger ([`MemoryStorage`],
//!   [`RedbStorage`])
//! - [`SecretStore`]: loads or generates the secret bundle once
//! - [`links`]: building and parsing share links
//! - [`Exchange`]: invite, accept, reply and terminate
//! - [`SystemEnv`]: production environment (real time, OS RNG)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod exchange;
pub mod links;
mod secret_store;
pub mod storage;
mod system_env;

pub use error::ServerError;
pub use exchange::{Accepted, Exchange, Invitation, Relay};
pub use secret_store::SecretStore;
pub use storage::{MemoryStorage, RedbStorage, Storage, StorageError};
pub use system_env::SystemEnv;
