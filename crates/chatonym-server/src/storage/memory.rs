#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use chatonym_core::Fingerprint;

use super::{Storage, StorageError};

/// In-memory storage for tests and one-shot runs.
///
/// Nothing survives the process. All state is behind one `Arc<Mutex<_>>`, so
/// clones share it.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryStorageInner>>,
}

#[derive(Default)]
struct MemoryStorageInner {
    /// Secret rows; more than one is an invariant violation
    secrets: Vec<String>,

    /// Terminated conversation fingerprints
    terminated: HashSet<String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of terminated conversations.
    pub fn terminated_count(&self) -> usize {
        self.lock().terminated.len()
    }

    /// Append a raw secret row, bypassing the single-row check.
    ///
    /// Lets tests reproduce a corrupted database.
    pub fn insert_secret_row(&self, blob: &str) {
        self.lock().secrets.push(blob.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStorageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get_secrets(&self) -> Result<Option<String>, StorageError> {
        let inner = self.lock();
        match inner.secrets.as_slice() {
            [] => Ok(None),
            [blob] => Ok(Some(blob.clone())),
            rows => Err(StorageError::Invariant(format!("{} secret rows", rows.len()))),
        }
    }

    fn set_secrets(&self, blob: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if !inner.secrets.is_empty() {
            return Err(StorageError::AlreadyExists);
        }
        inner.secrets.push(blob.to_string());
        Ok(())
    }

    fn is_terminated(&self, fingerprint: &Fingerprint) -> Result<bool, StorageError> {
        Ok(self.lock().terminated.contains(fingerprint.as_str()))
    }

    fn terminate(&self, fingerprint: &Fingerprint) -> Result<(), StorageError> {
        self.lock().terminated.insert(fingerprint.as_str().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(value: &str) -> Fingerprint {
        Fingerprint::from_string(value.to_string())
    }

    #[test]
    fn secrets_written_once() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_secrets().unwrap(), None);

        storage.set_secrets("blob").unwrap();
        assert_eq!(storage.get_secrets().unwrap(), Some("blob".to_string()));

        assert_eq!(storage.set_secrets("other"), Err(StorageError::AlreadyExists));
        assert_eq!(storage.get_secrets().unwrap(), Some("blob".to_string()));
    }

    #[test]
    fn multiple_secret_rows_is_invariant_violation() {
        let storage = MemoryStorage::new();
        storage.insert_secret_row("a");
        storage.insert_secret_row("b");

        assert!(matches!(storage.get_secrets(), Err(StorageError::Invariant(_))));
    }

    #[test]
    fn terminate_is_idempotent() {
        let storage = MemoryStorage::new();
        let fp = fingerprint("abc");

        assert!(!storage.is_terminated(&fp).unwrap());

        storage.terminate(&fp).unwrap();
        storage.terminate(&fp).unwrap();

        assert!(storage.is_terminated(&fp).unwrap());
        assert!(!storage.is_terminated(&fingerprint("abd")).unwrap());
        assert_eq!(storage.terminated_count(), 1);
    }

    #[test]
    fn clones_share_state() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();

        clone.terminate(&fingerprint("abc")).unwrap();
        assert!(storage.is_terminated(&fingerprint("abc")).unwrap());
    }
}
