//! Load-or-generate holder for the secret bundle.
//!
//! On first start the store generates a bundle and persists it; on every
//! later start it loads the persisted one. Either way the bundle is turned
//! into a [`SecretContext`] exactly once per store.

use std::sync::{Arc, OnceLock};

use chatonym_core::{Environment, SecretBundle, SecretContext, SecretError, SecretName};

use crate::{error::ServerError, storage::Storage};

/// Secret store over a [`Storage`] backend.
///
/// The at-most-once guard is per store instance. Other stores over the same
/// storage, in this process or another, cannot replace the persisted bundle:
/// [`Storage::set_secrets`] refuses a second write, so they load the same
/// secrets instead. Build one store at startup and share its context.
pub struct SecretStore<S: Storage, E: Environment> {
    storage: S,
    env: E,
    secret_bytes: usize,
    pepper_bytes: usize,
    context: OnceLock<Arc<SecretContext>>,
}

impl<S: Storage, E: Environment> SecretStore<S, E> {
    /// Create an uninitialized store.
    ///
    /// `secret_bytes` and `pepper_bytes` size newly generated secrets; they
    /// are ignored when a bundle is already persisted.
    pub fn new(storage: S, env: E, secret_bytes: usize, pepper_bytes: usize) -> Self {
        Self { storage, env, secret_bytes, pepper_bytes, context: OnceLock::new() }
    }

    /// Load the persisted bundle, or generate and persist a new one.
    ///
    /// # Errors
    ///
    /// - `Secret(AlreadyInitialized)`: called more than once
    /// - `Storage(AlreadyExists)`: another writer persisted a bundle first
    /// - `Storage(Invariant)`: more than one bundle is stored
    /// - `Secret(..)`: the stored bundle is corrupt or incomplete
    pub fn init(&self) -> Result<Arc<SecretContext>, ServerError> {
        if self.context.get().is_some() {
            return Err(SecretError::AlreadyInitialized.into());
        }

        let bundle = match self.storage.get_secrets()? {
            Some(blob) => {
                tracing::info!("loaded persisted secrets");
                SecretBundle::decode(&blob)?
            },
            None => {
                let bundle = SecretBundle::generate(&self.env, self.secret_bytes, self.pepper_bytes);
                self.storage.set_secrets(&bundle.encode()?)?;
                tracing::info!("generated and persisted new secrets");
                bundle
            },
        };

        let context = Arc::new(SecretContext::new(bundle)?);
        self.context.set(Arc::clone(&context)).map_err(|_| SecretError::AlreadyInitialized)?;

        Ok(context)
    }

    /// The initialized context.
    ///
    /// # Errors
    ///
    /// - `NotInitialized`: [`SecretStore::init`] has not succeeded
    pub fn context(&self) -> Result<Arc<SecretContext>, SecretError> {
        self.context.get().cloned().ok_or(SecretError::NotInitialized)
    }

    /// Read one secret.
    ///
    /// # Errors
    ///
    /// - `NotInitialized`: [`SecretStore::init`] has not succeeded
    /// - `Missing`: the secret is absent or empty
    pub fn get(&self, name: SecretName) -> Result<String, SecretError> {
        let context = self.context.get().ok_or(SecretError::NotInitialized)?;
        context.get(name).map(str::to_string)
    }

    /// Returns true once [`SecretStore::init`] has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.context.get().is_some()
    }
}
