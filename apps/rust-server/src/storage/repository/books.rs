// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Book repository.
//!
//! ## Integrity
//!
//! - A book's `author_id` resolves to an existing author on create and update
//! - Titles are unique case-insensitively
//! - Deleting a book removes its genre rows and every shelf slot holding it
//!   (all owners) before the book itself, in one write transaction

use redb::{ReadableTable, Table, WriteTransaction};
use serde::{Deserialize, Serialize};

use crate::models::capwords;
use crate::storage::database::{
    encode, load, load_all, next_id, CatalogDatabase, StoreError, StoreResult, AUTHORS, BOOKS,
    BOOK_GENRES, STORED_BOOKS,
};

/// Book row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub author_id: u64,
    pub pages: i64,
    pub year: i64,
}

/// Fields of a new book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub author_id: u64,
    pub pages: i64,
    pub year: i64,
    pub genres: Vec<String>,
}

/// Partial update; `None` keeps the current value.
///
/// `genres`, when present, is the desired genre list: missing labels are
/// added, labels not listed are removed, labels already present stay.
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_id: Option<u64>,
    pub pages: Option<i64>,
    pub year: Option<i64>,
    pub genres: Option<Vec<String>>,
}

/// Filters for [`BookRepository::list`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BookFilter<'q> {
    /// Case-insensitive exact genre match
    pub genre: Option<&'q str>,
    /// Case-insensitive title substring
    pub search_term: Option<&'q str>,
}

/// Repository for book operations.
pub struct BookRepository<'a> {
    db: &'a CatalogDatabase,
}

impl<'a> BookRepository<'a> {
    pub fn new(db: &'a CatalogDatabase) -> Self {
        Self { db }
    }

    /// Get a book by ID.
    pub fn get(&self, book_id: u64) -> StoreResult<BookRecord> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(BOOKS)?;
        load(&table, book_id)?.ok_or_else(|| StoreError::NotFound(format!("Book {book_id}")))
    }

    /// Genre labels of a book, alphabetically.
    pub fn genres(&self, book_id: u64) -> StoreResult<Vec<String>> {
        let read_txn = self.db.read()?;
        let table = read_txn.open_table(BOOK_GENRES)?;
        genres_of(&table, book_id)
    }

    /// Books ordered by title.
    pub fn list(&self, filter: BookFilter<'_>) -> StoreResult<Vec<BookRecord>> {
        let read_txn = self.db.read()?;
        let books_table = read_txn.open_table(BOOKS)?;
        let genres_table = read_txn.open_table(BOOK_GENRES)?;

        let mut books: Vec<BookRecord> = load_all(&books_table)?;

        if let Some(genre) = filter.genre.map(str::to_lowercase) {
            let mut matching = Vec::with_capacity(books.len());
            for book in books {
                let genres = genres_of(&genres_table, book.id)?;
                if genres.iter().any(|g| g.to_lowercase() == genre) {
                    matching.push(book);
                }
            }
            books = matching;
        }
        if let Some(term) = filter.search_term.map(str::to_lowercase) {
            books.retain(|b| b.title.to_lowercase().contains(&term));
        }

        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    /// Create a book with its genres.
    ///
    /// Fails `Conflict` on a duplicate title, then `NotFound` if the author
    /// does not exist.
    pub fn create(&self, book: NewBook) -> StoreResult<BookRecord> {
        let title = capwords(&book.title);

        let write_txn = self.db.write()?;
        let record = {
            let mut books = write_txn.open_table(BOOKS)?;
            ensure_unique_title(&books, &title, None)?;
            ensure_author_exists(&write_txn, book.author_id)?;

            let record = BookRecord {
                id: next_id(&write_txn, "books")?,
                title,
                description: book.description,
                author_id: book.author_id,
                pages: book.pages,
                year: book.year,
            };
            books.insert(record.id, encode(&record)?.as_slice())?;

            let mut genres = write_txn.open_table(BOOK_GENRES)?;
            for genre in &book.genres {
                genres.insert((record.id, capwords(genre).as_str()), ())?;
            }
            record
        };
        write_txn.commit()?;

        tracing::info!(book_id = record.id, author_id = record.author_id, "book created");
        Ok(record)
    }

    /// Apply `changes` to an existing book.
    ///
    /// Every check runs before the first write; a failed check leaves the
    /// book untouched.
    pub fn update(&self, book_id: u64, changes: BookChanges) -> StoreResult<BookRecord> {
        let write_txn = self.db.write()?;
        let record = {
            let mut books = write_txn.open_table(BOOKS)?;
            let mut record: BookRecord = load(&books, book_id)?
                .ok_or_else(|| StoreError::NotFound(format!("Book {book_id}")))?;

            if let Some(author_id) = changes.author_id {
                ensure_author_exists(&write_txn, author_id)?;
                record.author_id = author_id;
            }
            if let Some(title) = changes.title {
                let title = capwords(&title);
                ensure_unique_title(&books, &title, Some(book_id))?;
                record.title = title;
            }
            if let Some(description) = changes.description {
                record.description = description;
            }
            if let Some(pages) = changes.pages {
                record.pages = pages;
            }
            if let Some(year) = changes.year {
                record.year = year;
            }

            books.insert(book_id, encode(&record)?.as_slice())?;

            if let Some(wanted) = changes.genres {
                let mut genres = write_txn.open_table(BOOK_GENRES)?;
                apply_genre_diff(&mut genres, book_id, &wanted)?;
            }
            record
        };
        write_txn.commit()?;

        tracing::info!(book_id, "book updated");
        Ok(record)
    }

    /// Delete a book: genre rows, then shelf slots, then the book.
    pub fn delete(&self, book_id: u64) -> StoreResult<()> {
        let write_txn = self.db.write()?;
        {
            let mut books = write_txn.open_table(BOOKS)?;
            if books.get(book_id)?.is_none() {
                return Err(StoreError::NotFound(format!("Book {book_id}")));
            }

            let mut genres = write_txn.open_table(BOOK_GENRES)?;
            for genre in genres_of(&genres, book_id)? {
                genres.remove((book_id, genre.as_str()))?;
            }

            let mut slots = write_txn.open_table(STORED_BOOKS)?;
            let mut holders = Vec::new();
            for entry in slots.iter()? {
                let (key, _) = entry?;
                let (owner, stored_book) = key.value();
                if stored_book == book_id {
                    holders.push(owner.to_string());
                }
            }
            for owner in &holders {
                slots.remove((owner.as_str(), book_id))?;
            }

            books.remove(book_id)?;
        }
        write_txn.commit()?;

        tracing::info!(book_id, "book deleted");
        Ok(())
    }
}

/// Genre labels stored for `book_id`, in key order.
pub(crate) fn genres_of<R>(table: &R, book_id: u64) -> StoreResult<Vec<String>>
where
    R: ReadableTable<(u64, &'static str), ()>,
{
    let mut genres = Vec::new();
    for entry in table.range((book_id, "")..)? {
        let (key, _) = entry?;
        let (id, genre) = key.value();
        if id != book_id {
            break;
        }
        genres.push(genre.to_string());
    }
    Ok(genres)
}

/// Make the stored genre set of `book_id` equal `wanted`, touching only the
/// labels that differ.
fn apply_genre_diff(
    table: &mut Table<'_, (u64, &'static str), ()>,
    book_id: u64,
    wanted: &[String],
) -> StoreResult<()> {
    let current = genres_of(&*table, book_id)?;
    let wanted: Vec<String> = wanted.iter().map(|g| capwords(g)).collect();

    for stale in current.iter().filter(|g| !wanted.contains(g)) {
        table.remove((book_id, stale.as_str()))?;
    }
    for fresh in wanted.iter().filter(|g| !current.contains(g)) {
        table.insert((book_id, fresh.as_str()), ())?;
    }
    Ok(())
}

fn ensure_author_exists(txn: &WriteTransaction, author_id: u64) -> StoreResult<()> {
    let authors = txn.open_table(AUTHORS)?;
    if authors.get(author_id)?.is_none() {
        return Err(StoreError::NotFound(format!("Author {author_id}")));
    }
    Ok(())
}

/// Fail `Conflict` if another book already carries `title`.
fn ensure_unique_title<R>(table: &R, title: &str, except: Option<u64>) -> StoreResult<()>
where
    R: ReadableTable<u64, &'static [u8]>,
{
    let wanted = title.to_lowercase();
    let taken = load_all::<BookRecord, _>(table)?
        .iter()
        .any(|b| Some(b.id) != except && b.title.to_lowercase() == wanted);
    if taken {
        return Err(StoreError::Conflict(format!("Book title {title}")));
    }
    Ok(())
}
