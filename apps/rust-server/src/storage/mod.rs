// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent catalog storage in a single embedded redb file.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   catalog.redb   # authors, books, genres, shelves, shelf slots, sequences
//! ```
//!
//! Repositories borrow the [`CatalogDatabase`] and open one transaction per
//! call. Cross-entity rules (unique titles, one slot per book per owner,
//! cascades) are enforced inside that transaction.

pub mod database;
pub mod repository;

pub use database::{CatalogDatabase, StoreError, StoreResult, DATABASE_FILE};
pub use repository::{
    AuthorChanges, AuthorRecord, AuthorRepository, BookChanges, BookFilter, BookRecord,
    BookRepository, NewAuthor, NewBook, ShelfRecord, ShelfRepository, StoredBook,
};
