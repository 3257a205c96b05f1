// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Response bodies of the REST API plus the text normalisation shared by
//! the handlers and the repositories. All response types derive
//! `Serialize` and `ToSchema` for JSON output and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Books**: summary and detailed views, with the author reference
//! - **Authors**: list entries and the profile with paginated books
//! - **Shelves**: the owner's shelves and stored-book slots
//! - **Envelopes**: `success: true` wrappers for each endpoint

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::{AuthorRecord, BookRecord, ShelfRecord};

// =============================================================================
// Text Normalisation
// =============================================================================

/// Capitalise each whitespace-separated word and collapse whitespace runs.
///
/// `"the  LORD of the rings"` becomes `"The Lord Of The Rings"`.
pub fn capwords(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a birthday written `Y-M-D` or `Y/M/D`.
pub fn parse_birthday(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.trim().split(['-', '/']).collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };
    NaiveDate::from_ymd_opt(
        year.trim().parse().ok()?,
        month.trim().parse().ok()?,
        day.trim().parse().ok()?,
    )
}

// =============================================================================
// Book Models
// =============================================================================

/// Author reference embedded in book views.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: u64,
    pub name: String,
}

/// A book in list responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BookSummary {
    pub id: u64,
    pub title: String,
    pub genres: Vec<String>,
    pub author: AuthorRef,
}

impl BookSummary {
    pub fn new(book: BookRecord, genres: Vec<String>, author: &AuthorRecord) -> Self {
        Self {
            id: book.id,
            title: book.title,
            genres,
            author: AuthorRef {
                id: author.id,
                name: author.name.clone(),
            },
        }
    }
}

/// A book with every field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BookDetail {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub pages: i64,
    pub year: i64,
    pub author: AuthorRef,
}

impl BookDetail {
    pub fn new(book: BookRecord, genres: Vec<String>, author: &AuthorRecord) -> Self {
        Self {
            id: book.id,
            title: book.title,
            description: book.description,
            genres,
            pages: book.pages,
            year: book.year,
            author: AuthorRef {
                id: author.id,
                name: author.name.clone(),
            },
        }
    }
}

// =============================================================================
// Author Models
// =============================================================================

/// An author in list responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: u64,
    pub name: String,
}

impl From<AuthorRecord> for AuthorSummary {
    fn from(author: AuthorRecord) -> Self {
        Self {
            id: author.id,
            name: author.name,
        }
    }
}

/// One of an author's books, without the author block.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorBook {
    pub id: u64,
    pub title: String,
    pub genres: Vec<String>,
}

/// Author profile with a page of their books.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorDetail {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub birthday: String,
    pub books: Vec<AuthorBook>,
    pub total_books: usize,
    /// Distinct genres of the listed books, sorted.
    pub genres: Vec<String>,
}

impl AuthorDetail {
    pub fn new(author: AuthorRecord, books: Vec<AuthorBook>, total_books: usize) -> Self {
        let mut genres: Vec<String> = books.iter().flat_map(|b| b.genres.clone()).collect();
        genres.sort();
        genres.dedup();

        Self {
            id: author.id,
            name: author.name,
            description: author.description,
            birthday: author.birthday.format("%Y-%m-%d").to_string(),
            books,
            total_books,
            genres,
        }
    }
}

/// Author fields returned after an update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorProfile {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub birthday: String,
}

impl From<AuthorRecord> for AuthorProfile {
    fn from(author: AuthorRecord) -> Self {
        Self {
            id: author.id,
            name: author.name,
            description: author.description,
            birthday: author.birthday.format("%Y-%m-%d").to_string(),
        }
    }
}

// =============================================================================
// Shelf Models
// =============================================================================

/// A shelf in list responses. `id` is the owner-facing number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ShelfSummary {
    pub id: u64,
    pub name: String,
    pub total_books: usize,
}

impl ShelfSummary {
    pub fn new(shelf: ShelfRecord, total_books: usize) -> Self {
        Self {
            id: shelf.user_based_id,
            name: shelf.name,
            total_books,
        }
    }
}

/// A shelf with a page of its books.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ShelfDetail {
    pub id: u64,
    pub name: String,
    pub books: Vec<BookSummary>,
    pub total_books: usize,
}

/// A book's slot on one of the caller's shelves.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredBookView {
    pub book: BookSummary,
    /// Owner-facing shelf number.
    pub shelf: u64,
}

// =============================================================================
// Request bodies
// =============================================================================
//
// Handlers parse bodies by hand so that missing, mistyped and blank fields
// map to distinct statuses; these types describe the accepted shapes.

/// Body of `POST /books`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub title: String,
    pub description: String,
    /// Existing author id
    pub author_id: u64,
    pub pages: i64,
    pub year: i64,
    /// At least one genre label
    pub genres: Vec<String>,
}

/// Body of `PATCH /books/{id}`. Absent fields keep their value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_id: Option<u64>,
    pub pages: Option<i64>,
    pub year: Option<i64>,
    /// Full desired genre list
    pub genres: Option<Vec<String>>,
}

/// Body of `POST /authors`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuthorRequest {
    pub name: String,
    pub description: String,
    /// `YYYY-MM-DD` or `YYYY/MM/DD`
    #[schema(example = "1892-01-03")]
    pub birthday: String,
}

/// Body of `PATCH /authors/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAuthorRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub birthday: Option<String>,
}

/// Body of `POST /shelves` and `PATCH /shelves/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ShelfNameRequest {
    pub name: String,
}

/// Body of `POST /shelves/{id}/books`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StoreBookRequest {
    pub book_id: u64,
}

// =============================================================================
// Envelopes
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookListResponse {
    pub success: bool,
    pub books: Vec<BookSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub success: bool,
    pub book: BookDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookUpdatedResponse {
    pub success: bool,
    pub updated: u64,
    pub book: BookDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorListResponse {
    pub success: bool,
    pub authors: Vec<AuthorSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorResponse {
    pub success: bool,
    pub author: AuthorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorUpdatedResponse {
    pub success: bool,
    pub updated: u64,
    pub author: AuthorProfile,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShelfListResponse {
    pub success: bool,
    pub shelves: Vec<ShelfSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShelfResponse {
    pub success: bool,
    pub shelf: ShelfDetail,
}

/// `{created: id}`; for shelves the id is the owner-facing number.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedResponse {
    pub success: bool,
    pub updated: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoredResponse {
    pub success: bool,
    pub stored: StoredBookView,
}

/// `{removed: book_id}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemovedResponse {
    pub success: bool,
    pub removed: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub success: bool,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capwords_normalises_case_and_spacing() {
        assert_eq!(capwords("the  LORD of\tthe rings"), "The Lord Of The Rings");
        assert_eq!(capwords("  sci-fi "), "Sci-fi");
        assert_eq!(capwords(""), "");
    }

    #[test]
    fn birthday_accepts_dash_and_slash() {
        let expected = NaiveDate::from_ymd_opt(1947, 9, 21);
        assert_eq!(parse_birthday("1947-09-21"), expected);
        assert_eq!(parse_birthday("1947/9/21"), expected);
    }

    #[test]
    fn birthday_rejects_malformed_input() {
        assert_eq!(parse_birthday("21.09.1947"), None);
        assert_eq!(parse_birthday("1947-13-01"), None);
        assert_eq!(parse_birthday("1947-02-30"), None);
        assert_eq!(parse_birthday("1947-09"), None);
        assert_eq!(parse_birthday("yesterday"), None);
    }

    #[test]
    fn author_detail_collects_distinct_sorted_genres() {
        let author = AuthorRecord {
            id: 3,
            name: "Stephen King".to_string(),
            description: "horror".to_string(),
            birthday: NaiveDate::from_ymd_opt(1947, 9, 21).unwrap(),
        };
        let books = vec![
            AuthorBook {
                id: 1,
                title: "It".to_string(),
                genres: vec!["Horror".to_string(), "Thriller".to_string()],
            },
            AuthorBook {
                id: 2,
                title: "Misery".to_string(),
                genres: vec!["Thriller".to_string()],
            },
        ];

        let detail = AuthorDetail::new(author, books, 5);
        assert_eq!(detail.genres, vec!["Horror", "Thriller"]);
        assert_eq!(detail.birthday, "1947-09-21");
        assert_eq!(detail.total_books, 5);
    }

    #[test]
    fn shelf_summary_exposes_user_based_id() {
        let shelf = ShelfRecord {
            id: 40,
            owner_id: "auth0|x".to_string(),
            user_based_id: 2,
            name: "read".to_string(),
        };
        let summary = ShelfSummary::new(shelf, 4);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, serde_json::json!({"id": 2, "name": "read", "total_books": 4}));
    }
}
