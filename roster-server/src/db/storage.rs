//! redb-based storage layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | `user_id` | `UserRecord` | Accounts (argon2 hash, role) |
//! | `usernames` | `username` | `user_id` | Unique username index |
//! | `companies` | `company_id` | `Company` | Directory |
//! | `projects` | `project_id` | `Project` | Directory |
//! | `employees` | `employee_id` | `Employee` | Employee records |
//! | `changes` | `change_id` | `PendingChange` | Lifecycle change requests |
//! | `sequence_counter` | entity name | `u64` | Id allocation |
//! | `revoked_tokens` | `jti` | expiry (unix secs) | Logout |
//!
//! Values are JSON. Keys are ascending integers, so a table scan returns
//! records in creation order.
//!
//! # Concurrency
//!
//! redb admits one write transaction at a time. Every lifecycle transition
//! reads and writes inside a single write transaction, which is what makes
//! approve/reject at-most-once per change id.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::AppError;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Record table: key = entity id, value = JSON bytes
pub type RecordTable = TableDefinition<'static, i64, &'static [u8]>;

pub const USERS_TABLE: RecordTable = TableDefinition::new("users");
pub const COMPANIES_TABLE: RecordTable = TableDefinition::new("companies");
pub const PROJECTS_TABLE: RecordTable = TableDefinition::new("projects");
pub const EMPLOYEES_TABLE: RecordTable = TableDefinition::new("employees");
pub const CHANGES_TABLE: RecordTable = TableDefinition::new("changes");

/// Username index: key = username, value = user id
pub const USERNAMES_TABLE: TableDefinition<&str, i64> = TableDefinition::new("usernames");

/// Table for sequence counters: key = entity name, value = last allocated id
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

/// Revoked token ids: key = jti, value = token expiry (unix seconds)
pub const REVOKED_TOKENS_TABLE: TableDefinition<&str, i64> =
    TableDefinition::new("revoked_tokens");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::database(err.to_string())
    }
}

/// Roster storage backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, ephemeral runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS_TABLE)?;
            let _ = write_txn.open_table(USERNAMES_TABLE)?;
            let _ = write_txn.open_table(COMPANIES_TABLE)?;
            let _ = write_txn.open_table(PROJECTS_TABLE)?;
            let _ = write_txn.open_table(EMPLOYEES_TABLE)?;
            let _ = write_txn.open_table(CHANGES_TABLE)?;
            let _ = write_txn.open_table(SEQUENCE_TABLE)?;
            let _ = write_txn.open_table(REVOKED_TOKENS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction (blocks while another one is open)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Read-only helpers ==========

    /// Load one record outside of any write transaction
    pub fn read<T: DeserializeOwned>(&self, table: RecordTable, id: i64) -> StorageResult<Option<T>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(table)?;
        get_from(&table, id)
    }

    /// Load every record of a table in id order
    pub fn read_all<T: DeserializeOwned>(&self, table: RecordTable) -> StorageResult<Vec<T>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(table)?;
        scan_from(&table)
    }

    /// Look up a user id by username
    pub fn user_id_by_name(&self, username: &str) -> StorageResult<Option<i64>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(USERNAMES_TABLE)?;
        Ok(table.get(username)?.map(|guard| guard.value()))
    }

    /// Whether a token id has been revoked
    pub fn is_revoked(&self, jti: &str) -> StorageResult<bool> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(REVOKED_TOKENS_TABLE)?;
        Ok(table.get(jti)?.is_some())
    }
}

// ========== Transaction helpers ==========

fn get_from<T, R>(table: &R, id: i64) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<i64, &'static [u8]>,
{
    let record = match table.get(id)? {
        Some(guard) => Some(serde_json::from_slice(guard.value())?),
        None => None,
    };
    Ok(record)
}

fn scan_from<T, R>(table: &R) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<i64, &'static [u8]>,
{
    let mut records = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        records.push(serde_json::from_slice(value.value())?);
    }
    Ok(records)
}

/// Load one record inside a write transaction
pub fn get<T: DeserializeOwned>(
    txn: &WriteTransaction,
    table: RecordTable,
    id: i64,
) -> StorageResult<Option<T>> {
    let table = txn.open_table(table)?;
    get_from(&table, id)
}

/// Load every record of a table inside a write transaction
pub fn scan<T: DeserializeOwned>(txn: &WriteTransaction, table: RecordTable) -> StorageResult<Vec<T>> {
    let table = txn.open_table(table)?;
    scan_from(&table)
}

/// Insert or replace one record
pub fn put<T: Serialize>(
    txn: &WriteTransaction,
    table: RecordTable,
    id: i64,
    value: &T,
) -> StorageResult<()> {
    let bytes = serde_json::to_vec(value)?;
    let mut table = txn.open_table(table)?;
    table.insert(id, bytes.as_slice())?;
    Ok(())
}

/// Allocate the next id for an entity
pub fn next_id(txn: &WriteTransaction, entity: &str) -> StorageResult<i64> {
    let mut table = txn.open_table(SEQUENCE_TABLE)?;
    let current = table.get(entity)?.map(|guard| guard.value()).unwrap_or(0);
    let next = current + 1;
    table.insert(entity, next)?;
    Ok(next as i64)
}
