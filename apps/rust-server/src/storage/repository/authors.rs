// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Author repository.
//!
//! Names are stored word-capitalised and are unique case-insensitively.
//! An author cannot be deleted while any book references it.

use chrono::NaiveDate;
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::models::capwords;
use crate::storage::database::{
    encode, load, load_all, next_id, CatalogDatabase, StoreError, StoreResult, AUTHORS, BOOKS,
};

use super::books::BookRecord;

/// Author row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorRecord {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub birthday: NaiveDate,
}

/// Fields of a new author.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: String,
    pub description: String,
    pub birthday: NaiveDate,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct AuthorChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Repository for author operations.
pub struct AuthorRepository<'a> {
    db: &'a CatalogDatabase,
}

impl<'a> AuthorRepository<'a> {
    pub fn new(db: &'a CatalogDatabase) -> Self {
        Self { db }
    }

    /// Get an author by ID.
    pub fn get(&self, author_id: u64) -> StoreResult<AuthorRecord> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(AUTHORS)?;
        load(&table, author_id)?.ok_or_else(|| StoreError::NotFound(format!("Author {author_id}")))
    }

    /// Authors ordered by name, optionally filtered by a case-insensitive
    /// name substring.
    pub fn list(&self, search_term: Option<&str>) -> StoreResult<Vec<AuthorRecord>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(AUTHORS)?;
        let mut authors: Vec<AuthorRecord> = load_all(&table)?;

        if let Some(term) = search_term.map(str::to_lowercase) {
            authors.retain(|a| a.name.to_lowercase().contains(&term));
        }
        authors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(authors)
    }

    /// Books written by `author_id`, ordered by title.
    pub fn books(&self, author_id: u64) -> StoreResult<Vec<BookRecord>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(BOOKS)?;
        let mut books: Vec<BookRecord> = load_all(&table)?;
        books.retain(|b| b.author_id == author_id);
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    /// Create an author. Fails `Conflict` on a duplicate name.
    pub fn create(&self, author: NewAuthor) -> StoreResult<AuthorRecord> {
        let name = capwords(&author.name);

        let write_txn = self.db.write()?;
        let record = {
            let mut table = write_txn.open_table(AUTHORS)?;
            ensure_unique_name(&table, &name, None)?;

            let record = AuthorRecord {
                id: next_id(&write_txn, "authors")?,
                name,
                description: author.description,
                birthday: author.birthday,
            };
            table.insert(record.id, encode(&record)?.as_slice())?;
            record
        };
        write_txn.commit()?;

        tracing::info!(author_id = record.id, "author created");
        Ok(record)
    }

    /// Apply `changes` to an existing author.
    pub fn update(&self, author_id: u64, changes: AuthorChanges) -> StoreResult<AuthorRecord> {
        let write_txn = self.db.write()?;
        let record = {
            let mut table = write_txn.open_table(AUTHORS)?;
            let mut record: AuthorRecord = load(&table, author_id)?
                .ok_or_else(|| StoreError::NotFound(format!("Author {author_id}")))?;

            if let Some(name) = changes.name {
                let name = capwords(&name);
                ensure_unique_name(&table, &name, Some(author_id))?;
                record.name = name;
            }
            if let Some(description) = changes.description {
                record.description = description;
            }
            if let Some(birthday) = changes.birthday {
                record.birthday = birthday;
            }

            table.insert(author_id, encode(&record)?.as_slice())?;
            record
        };
        write_txn.commit()?;

        tracing::info!(author_id, "author updated");
        Ok(record)
    }

    /// Delete an author that no book references.
    pub fn delete(&self, author_id: u64) -> StoreResult<()> {
        let write_txn = self.db.write()?;
        {
            let mut authors = write_txn.open_table(AUTHORS)?;
            if authors.get(author_id)?.is_none() {
                return Err(StoreError::NotFound(format!("Author {author_id}")));
            }

            let books = write_txn.open_table(BOOKS)?;
            let referenced = load_all::<BookRecord, _>(&books)?
                .iter()
                .any(|b| b.author_id == author_id);
            if referenced {
                return Err(StoreError::Conflict(format!(
                    "Author {author_id} still has books"
                )));
            }

            authors.remove(author_id)?;
        }
        write_txn.commit()?;

        tracing::info!(author_id, "author deleted");
        Ok(())
    }
}

/// Fail `Conflict` if another author already carries `name`.
fn ensure_unique_name<R>(table: &R, name: &str, except: Option<u64>) -> StoreResult<()>
where
    R: ReadableTable<u64, &'static [u8]>,
{
    let wanted = name.to_lowercase();
    let taken = load_all::<AuthorRecord, _>(table)?
        .iter()
        .any(|a| Some(a.id) != except && a.name.to_lowercase() == wanted);
    if taken {
        return Err(StoreError::Conflict(format!("Author name {name}")));
    }
    Ok(())
}
