// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded catalog database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `authors`: author id → serialized AuthorRecord
//! - `books`: book id → serialized BookRecord
//! - `book_genres`: (book id, genre) → ()
//! - `shelves`: shelf id → serialized ShelfRecord
//! - `shelf_index`: (owner, user_based_id) → shelf id
//! - `stored_books`: (owner, book id) → shelf id
//! - `sequences`: sequence name → last issued value
//!
//! Every mutation runs in one write transaction, so a cascade either
//! commits completely or leaves no trace.

use std::path::Path;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: author id → AuthorRecord (JSON bytes).
pub(crate) const AUTHORS: TableDefinition<u64, &[u8]> = TableDefinition::new("authors");

/// Primary table: book id → BookRecord (JSON bytes).
pub(crate) const BOOKS: TableDefinition<u64, &[u8]> = TableDefinition::new("books");

/// Genre labels per book. The composite key is the row identity.
pub(crate) const BOOK_GENRES: TableDefinition<(u64, &str), ()> =
    TableDefinition::new("book_genres");

/// Primary table: shelf id → ShelfRecord (JSON bytes).
pub(crate) const SHELVES: TableDefinition<u64, &[u8]> = TableDefinition::new("shelves");

/// Index: (owner, user_based_id) → shelf id.
pub(crate) const SHELF_INDEX: TableDefinition<(&str, u64), u64> =
    TableDefinition::new("shelf_index");

/// Shelf slots: (owner, book id) → shelf id. One slot per book per owner.
pub(crate) const STORED_BOOKS: TableDefinition<(&str, u64), u64> =
    TableDefinition::new("stored_books");

/// Monotonic counters for ids.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "catalog.redb";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// CatalogDatabase
// =============================================================================

/// Embedded ACID catalog database.
pub struct CatalogDatabase {
    db: Database,
}

impl CatalogDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(AUTHORS)?;
            let _ = write_txn.open_table(BOOKS)?;
            let _ = write_txn.open_table(BOOK_GENRES)?;
            let _ = write_txn.open_table(SHELVES)?;
            let _ = write_txn.open_table(SHELF_INDEX)?;
            let _ = write_txn.open_table(STORED_BOOKS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "catalog database opened");
        Ok(Self { db })
    }

    /// Open `catalog.redb` inside `data_dir`.
    pub fn open_in(data_dir: &Path) -> StoreResult<Self> {
        Self::open(&data_dir.join(DATABASE_FILE))
    }

    pub(crate) fn write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    pub(crate) fn read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Readiness probe: a read transaction can be opened and a table read.
    pub fn is_healthy(&self) -> bool {
        let check = || -> StoreResult<()> {
            let read_txn = self.read()?;
            let table = read_txn.open_table(AUTHORS)?;
            let _ = table.first()?;
            Ok(())
        };
        match check() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "catalog database health check failed");
                false
            }
        }
    }
}

// =============================================================================
// Record Helpers
// =============================================================================

/// Issue the next value of the named sequence inside `txn`.
///
/// Values start at 1 and are never reused, even after the rows that
/// consumed them are deleted.
pub(crate) fn next_id(txn: &WriteTransaction, sequence: &str) -> StoreResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let current = table.get(sequence)?.map(|v| v.value()).unwrap_or(0);
    let next = current + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

/// Load and decode one JSON record.
pub(crate) fn load<T, R>(table: &R, id: u64) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Decode every record of a JSON table, in id order.
pub(crate) fn load_all<T, R>(table: &R) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<u64, &'static [u8]>,
{
    let mut records = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        records.push(serde_json::from_slice(value.value())?);
    }
    Ok(records)
}

pub(crate) fn encode<T: Serialize>(record: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

// =============================================================================
// Tests
// =============================================================================
