// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the catalog database.
//!
//! Each repository provides CRUD operations for a specific entity type.

pub mod authors;
pub mod books;
pub mod shelves;

pub use authors::{AuthorChanges, AuthorRecord, AuthorRepository, NewAuthor};
pub use books::{BookChanges, BookFilter, BookRecord, BookRepository, NewBook};
pub use shelves::{ShelfRecord, ShelfRepository, StoredBook};
