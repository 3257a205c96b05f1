// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shelf repository: per-owner reading shelves and their book slots.
//!
//! ## Integrity
//!
//! - Every lookup is scoped by owner; another owner's shelf is `NotFound`
//! - `user_based_id` comes from a per-owner counter: shelves created in
//!   sequence are numbered 1..N, and deleting one never renumbers the rest
//!   or frees its number
//! - A book occupies at most one slot per owner, across all of that
//!   owner's shelves
//! - Deleting a shelf removes its slots before the shelf, in one write
//!   transaction

use redb::{ReadableTable, WriteTransaction};
use serde::{Deserialize, Serialize};

use crate::storage::database::{
    encode, load, next_id, CatalogDatabase, StoreError, StoreResult, BOOKS, SHELF_INDEX, SHELVES,
    STORED_BOOKS,
};
use crate::storage::repository::books::BookRecord;

/// Shelf row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShelfRecord {
    /// Global id, internal only
    pub id: u64,
    pub owner_id: String,
    /// Id the owner sees
    pub user_based_id: u64,
    pub name: String,
}

/// A book's slot on one of its owner's shelves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBook {
    pub owner_id: String,
    pub book_id: u64,
    pub shelf_id: u64,
}

/// Repository for shelf operations.
pub struct ShelfRepository<'a> {
    db: &'a CatalogDatabase,
}

impl<'a> ShelfRepository<'a> {
    pub fn new(db: &'a CatalogDatabase) -> Self {
        Self { db }
    }

    /// Shelves of `owner`, ordered by `user_based_id`.
    pub fn list(&self, owner: &str) -> StoreResult<Vec<ShelfRecord>> {
        let read_txn = self.db.read()?;
        let index = read_txn.open_table(SHELF_INDEX)?;
        let shelves = read_txn.open_table(SHELVES)?;
        owned_shelves(&index, &shelves, owner)
    }

    /// Get a shelf by `(owner, user_based_id)`.
    pub fn get(&self, owner: &str, user_based_id: u64) -> StoreResult<ShelfRecord> {
        let read_txn = self.db.read()?;
        let index = read_txn.open_table(SHELF_INDEX)?;
        let shelves = read_txn.open_table(SHELVES)?;
        resolve(&index, &shelves, owner, user_based_id)
    }

    /// A shelf and the books stored on it, ordered by title, read from one
    /// snapshot.
    pub fn with_books(
        &self,
        owner: &str,
        user_based_id: u64,
    ) -> StoreResult<(ShelfRecord, Vec<BookRecord>)> {
        let read_txn = self.db.read()?;
        let index = read_txn.open_table(SHELF_INDEX)?;
        let shelves = read_txn.open_table(SHELVES)?;
        let slots = read_txn.open_table(STORED_BOOKS)?;
        let books = read_txn.open_table(BOOKS)?;

        let shelf = resolve(&index, &shelves, owner, user_based_id)?;
        let mut stored = Vec::new();
        for book_id in slots_on(&slots, owner, shelf.id)? {
            let book: BookRecord = load(&books, book_id)?
                .ok_or_else(|| StoreError::NotFound(format!("Book {book_id}")))?;
            stored.push(book);
        }
        stored.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok((shelf, stored))
    }

    /// Number of books stored on `shelf`.
    pub fn count_books(&self, shelf: &ShelfRecord) -> StoreResult<usize> {
        let read_txn = self.db.read()?;
        let slots = read_txn.open_table(STORED_BOOKS)?;
        Ok(slots_on(&slots, &shelf.owner_id, shelf.id)?.len())
    }

    /// Create a shelf for `owner`.
    ///
    /// Fails `Conflict` if the owner already has a shelf with this name,
    /// compared case-insensitively.
    pub fn create(&self, owner: &str, name: &str) -> StoreResult<ShelfRecord> {
        let write_txn = self.db.write()?;
        let record = {
            let mut index = write_txn.open_table(SHELF_INDEX)?;
            let mut shelves = write_txn.open_table(SHELVES)?;
            ensure_unique_name(&owned_shelves(&index, &shelves, owner)?, name, None)?;

            let record = ShelfRecord {
                id: next_id(&write_txn, "shelves")?,
                owner_id: owner.to_string(),
                user_based_id: next_id(&write_txn, &owner_sequence(owner))?,
                name: name.to_string(),
            };
            shelves.insert(record.id, encode(&record)?.as_slice())?;
            index.insert((owner, record.user_based_id), record.id)?;
            record
        };
        write_txn.commit()?;

        tracing::info!(
            owner = %owner,
            shelf = record.user_based_id,
            "shelf created"
        );
        Ok(record)
    }

    /// Rename a shelf. Fails `Conflict` if another of the owner's shelves
    /// already carries the name.
    pub fn rename(&self, owner: &str, user_based_id: u64, name: &str) -> StoreResult<ShelfRecord> {
        let write_txn = self.db.write()?;
        let record = {
            let index = write_txn.open_table(SHELF_INDEX)?;
            let mut shelves = write_txn.open_table(SHELVES)?;
            let mut record = resolve(&index, &shelves, owner, user_based_id)?;
            ensure_unique_name(
                &owned_shelves(&index, &shelves, owner)?,
                name,
                Some(record.id),
            )?;

            record.name = name.to_string();
            shelves.insert(record.id, encode(&record)?.as_slice())?;
            record
        };
        write_txn.commit()?;

        tracing::info!(owner = %owner, shelf = user_based_id, "shelf renamed");
        Ok(record)
    }

    /// Delete a shelf and every slot on it.
    pub fn delete(&self, owner: &str, user_based_id: u64) -> StoreResult<()> {
        let write_txn = self.db.write()?;
        {
            let mut index = write_txn.open_table(SHELF_INDEX)?;
            let mut shelves = write_txn.open_table(SHELVES)?;
            let mut slots = write_txn.open_table(STORED_BOOKS)?;

            let shelf = resolve(&index, &shelves, owner, user_based_id)?;
            for book_id in slots_on(&slots, owner, shelf.id)? {
                slots.remove((owner, book_id))?;
            }
            index.remove((owner, user_based_id))?;
            shelves.remove(shelf.id)?;
        }
        write_txn.commit()?;

        tracing::info!(owner = %owner, shelf = user_based_id, "shelf deleted");
        Ok(())
    }

    /// Put `book_id` on one of `owner`'s shelves.
    ///
    /// Fails `NotFound` for an unknown shelf or book, and `Conflict` if the
    /// book already sits on any of the owner's shelves.
    pub fn store_book(
        &self,
        owner: &str,
        user_based_id: u64,
        book_id: u64,
    ) -> StoreResult<StoredBook> {
        let write_txn = self.db.write()?;
        let stored = {
            let index = write_txn.open_table(SHELF_INDEX)?;
            let shelves = write_txn.open_table(SHELVES)?;
            let shelf = resolve(&index, &shelves, owner, user_based_id)?;
            ensure_book_exists(&write_txn, book_id)?;

            let mut slots = write_txn.open_table(STORED_BOOKS)?;
            if let Some(existing) = slots.get((owner, book_id))?.map(|v| v.value()) {
                return Err(StoreError::Conflict(format!(
                    "Book {book_id} already stored on shelf {existing}"
                )));
            }
            slots.insert((owner, book_id), shelf.id)?;

            StoredBook {
                owner_id: owner.to_string(),
                book_id,
                shelf_id: shelf.id,
            }
        };
        write_txn.commit()?;

        tracing::info!(owner = %owner, shelf = user_based_id, book_id, "book stored");
        Ok(stored)
    }

    /// Take `book_id` off the owner's shelves.
    ///
    /// The shelf named in the request must exist for the owner; the slot
    /// itself is resolved by `(owner, book)` alone.
    pub fn remove_book(
        &self,
        owner: &str,
        user_based_id: u64,
        book_id: u64,
    ) -> StoreResult<StoredBook> {
        let write_txn = self.db.write()?;
        let removed = {
            let index = write_txn.open_table(SHELF_INDEX)?;
            let shelves = write_txn.open_table(SHELVES)?;
            resolve(&index, &shelves, owner, user_based_id)?;

            let mut slots = write_txn.open_table(STORED_BOOKS)?;
            let shelf_id = slots
                .remove((owner, book_id))?
                .map(|v| v.value())
                .ok_or_else(|| StoreError::NotFound(format!("Stored book {book_id}")))?;

            StoredBook {
                owner_id: owner.to_string(),
                book_id,
                shelf_id,
            }
        };
        write_txn.commit()?;

        tracing::info!(owner = %owner, book_id, "book removed from shelf");
        Ok(removed)
    }

    /// Slot holding `book_id` for `owner`, if any.
    #[cfg(test)]
    pub fn slot_of(&self, owner: &str, book_id: u64) -> StoreResult<Option<StoredBook>> {
        let read_txn = self.db.read()?;
        let slots = read_txn.open_table(STORED_BOOKS)?;
        let shelf_id = slots.get((owner, book_id))?.map(|v| v.value());
        Ok(shelf_id.map(|shelf_id| StoredBook {
            owner_id: owner.to_string(),
            book_id,
            shelf_id,
        }))
    }
}

/// Sequence key for an owner's `user_based_id` counter.
fn owner_sequence(owner: &str) -> String {
    format!("shelf:{owner}")
}

fn resolve<I, S>(index: &I, shelves: &S, owner: &str, user_based_id: u64) -> StoreResult<ShelfRecord>
where
    I: ReadableTable<(&'static str, u64), u64>,
    S: ReadableTable<u64, &'static [u8]>,
{
    let not_found = || StoreError::NotFound(format!("Shelf {user_based_id}"));
    let shelf_id = index
        .get((owner, user_based_id))?
        .map(|v| v.value())
        .ok_or_else(not_found)?;
    load(shelves, shelf_id)?.ok_or_else(not_found)
}

fn owned_shelves<I, S>(index: &I, shelves: &S, owner: &str) -> StoreResult<Vec<ShelfRecord>>
where
    I: ReadableTable<(&'static str, u64), u64>,
    S: ReadableTable<u64, &'static [u8]>,
{
    let mut ids = Vec::new();
    for entry in index.range((owner, 0u64)..=(owner, u64::MAX))? {
        let (_, shelf_id) = entry?;
        ids.push(shelf_id.value());
    }

    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(record) = load(shelves, id)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Book ids in `owner`'s slots that point at `shelf_id`.
fn slots_on<T>(slots: &T, owner: &str, shelf_id: u64) -> StoreResult<Vec<u64>>
where
    T: ReadableTable<(&'static str, u64), u64>,
{
    let mut books = Vec::new();
    for entry in slots.range((owner, 0u64)..=(owner, u64::MAX))? {
        let (key, value) = entry?;
        if value.value() == shelf_id {
            books.push(key.value().1);
        }
    }
    Ok(books)
}

fn ensure_unique_name(owned: &[ShelfRecord], name: &str, except: Option<u64>) -> StoreResult<()> {
    let wanted = name.to_lowercase();
    if owned
        .iter()
        .any(|s| Some(s.id) != except && s.name.to_lowercase() == wanted)
    {
        return Err(StoreError::Conflict(format!("Shelf name {name}")));
    }
    Ok(())
}

fn ensure_book_exists(txn: &WriteTransaction, book_id: u64) -> StoreResult<()> {
    let books = txn.open_table(BOOKS)?;
    if books.get(book_id)?.is_none() {
        return Err(StoreError::NotFound(format!("Book {book_id}")));
    }
    Ok(())
}
