//! Redb-backed durable storage implementation.
//!
//! Uses Redb's ACID transactions with Copy-on-Write for crash safety. The
//! secret bundle and the termination ledger survive restarts.

use std::{path::Path, sync::Arc};

use chatonym_core::Fingerprint;
use redb::{Database, ReadableTable, TableDefinition};

use super::{Storage, StorageError};

/// Table: secrets
/// Key: row id (always 0 when healthy)
/// Value: base64url secret bundle blob
const SECRETS: TableDefinition<u64, &str> = TableDefinition::new("secrets");

/// Table: terminated_chats
/// Key: conversation fingerprint
/// Value: none
const TERMINATED_CHATS: TableDefinition<&str, ()> = TableDefinition::new("terminated_chats");

const SECRET_ROW: u64 = 0;

/// Durable storage backed by Redb.
///
/// Thread-safe through Redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open or create a Redb database at the given path.
    ///
    /// Creates both tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path.as_ref()).map_err(io_error)?;

        let txn = db.begin_write().map_err(io_error)?;
        {
            let _ = txn.open_table(SECRETS).map_err(io_error)?;
            let _ = txn.open_table(TERMINATED_CHATS).map_err(io_error)?;
        }
        txn.commit().map_err(io_error)?;

        tracing::debug!(path = %path.as_ref().display(), "opened database");
        Ok(Self { db: Arc::new(db) })
    }
}

impl Storage for RedbStorage {
    fn get_secrets(&self) -> Result<Option<String>, StorageError> {
        let txn = self.db.begin_read().map_err(io_error)?;
        let table = txn.open_table(SECRETS).map_err(io_error)?;

        let mut rows = Vec::new();
        for row in table.iter().map_err(io_error)? {
            let (_, blob) = row.map_err(io_error)?;
            rows.push(blob.value().to_string());
        }

        if rows.len() > 1 {
            return Err(StorageError::Invariant(format!("{} secret rows", rows.len())));
        }
        Ok(rows.pop())
    }

    fn set_secrets(&self, blob: &str) -> Result<(), StorageError> {
        let txn = self.db.begin_write().map_err(io_error)?;
        {
            let mut table = txn.open_table(SECRETS).map_err(io_error)?;

            if table.iter().map_err(io_error)?.next().is_some() {
                return Err(StorageError::AlreadyExists);
            }

            table.insert(SECRET_ROW, blob).map_err(io_error)?;
        }
        txn.commit().map_err(io_error)?;

        Ok(())
    }

    fn is_terminated(&self, fingerprint: &Fingerprint) -> Result<bool, StorageError> {
        let txn = self.db.begin_read().map_err(io_error)?;
        let table = txn.open_table(TERMINATED_CHATS).map_err(io_error)?;

        Ok(table.get(fingerprint.as_str()).map_err(io_error)?.is_some())
    }

    fn terminate(&self, fingerprint: &Fingerprint) -> Result<(), StorageError> {
        let txn = self.db.begin_write().map_err(io_error)?;
        {
            let mut table = txn.open_table(TERMINATED_CHATS).map_err(io_error)?;
            table.insert(fingerprint.as_str(), ()).map_err(io_error)?;
        }
        txn.commit().map_err(io_error)?;

        Ok(())
    }
}

#[allow(clippy::needless_pass_by_value)]
fn io_error(err: impl std::error::Error) -> StorageError {
    StorageError::Io(err.to_string())
}
