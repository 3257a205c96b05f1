// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    api::{
        body::{
            optional_genres, optional_integer, optional_reference, optional_text,
            parse_id, parse_non_empty_object, require_fields, required_genres, required_integer,
            required_reference, required_text,
        },
        pagination::{page_number, paginate},
    },
    auth::Auth,
    error::ApiError,
    models::{
        BookDetail, BookListResponse, BookResponse, BookSummary, BookUpdatedResponse,
        CreateBookRequest, CreatedResponse, DeletedResponse, UpdateBookRequest,
    },
    state::AppState,
    storage::{
        AuthorRecord, AuthorRepository, BookChanges, BookFilter, BookRecord, BookRepository,
        CatalogDatabase, NewBook,
    },
};

const CREATE_FIELDS: &[&str] = &["title", "description", "author_id", "pages", "year", "genres"];

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Exact genre, case-insensitive
    pub genre: Option<String>,
    /// Title substring, case-insensitive
    pub search_term: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
}

/// Summaries for `books`, resolving each author once.
pub(crate) fn summarize(
    db: &CatalogDatabase,
    books: Vec<BookRecord>,
) -> Result<Vec<BookSummary>, ApiError> {
    let book_repo = BookRepository::new(db);
    let author_repo = AuthorRepository::new(db);
    let mut authors: HashMap<u64, AuthorRecord> = HashMap::new();

    let mut summaries = Vec::with_capacity(books.len());
    for book in books {
        if !authors.contains_key(&book.author_id) {
            authors.insert(book.author_id, author_repo.get(book.author_id)?);
        }
        let genres = book_repo.genres(book.id)?;
        let author = &authors[&book.author_id];
        summaries.push(BookSummary::new(book, genres, author));
    }
    Ok(summaries)
}

fn detail(db: &CatalogDatabase, book: BookRecord) -> Result<BookDetail, ApiError> {
    let genres = BookRepository::new(db).genres(book.id)?;
    let author = AuthorRepository::new(db).get(book.author_id)?;
    Ok(BookDetail::new(book, genres, &author))
}

#[utoipa::path(
    get,
    path = "/books",
    params(BookQuery),
    tag = "Books",
    responses((status = 200, body = BookListResponse))
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Json<BookListResponse>, ApiError> {
    let filter = BookFilter {
        genre: query.genre.as_deref().filter(|g| !g.trim().is_empty()),
        search_term: query.search_term.as_deref().filter(|t| !t.is_empty()),
    };
    let books = BookRepository::new(&state.db).list(filter)?;
    let total = books.len();
    let page = paginate(books, page_number(query.page.as_deref()));

    Ok(Json(BookListResponse {
        success: true,
        books: summarize(&state.db, page)?,
        total,
    }))
}

#[utoipa::path(
    post,
    path = "/books",
    request_body = CreateBookRequest,
    tag = "Books",
    security(("bearer" = ["post:books"])),
    responses(
        (status = 201, body = CreatedResponse),
        (status = 400), (status = 401), (status = 403),
        (status = 404, description = "Unknown author"),
        (status = 409, description = "Duplicate title"),
        (status = 422)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Auth(subject): Auth,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let body = parse_non_empty_object(&body)?;
    require_fields(&body, CREATE_FIELDS)?;
    let book = NewBook {
        title: required_text(&body, "title")?,
        description: required_text(&body, "description")?,
        author_id: required_reference(&body, "author_id")?,
        pages: required_integer(&body, "pages")?,
        year: required_integer(&body, "year")?,
        genres: required_genres(&body)?,
    };

    let record = BookRepository::new(&state.db).create(book)?;
    tracing::info!(book_id = record.id, subject = %subject.subject_id, "book added to catalog");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            created: record.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    tag = "Books",
    responses((status = 200, body = BookResponse), (status = 404))
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_id(&id, "Book")?;
    let book = BookRepository::new(&state.db).get(id)?;
    Ok(Json(BookResponse {
        success: true,
        book: detail(&state.db, book)?,
    }))
}

#[utoipa::path(
    patch,
    path = "/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    tag = "Books",
    security(("bearer" = ["patch:books"])),
    responses(
        (status = 200, body = BookUpdatedResponse),
        (status = 400), (status = 401), (status = 403),
        (status = 404, description = "Unknown book or author"),
        (status = 409, description = "Duplicate title"),
        (status = 422)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<BookUpdatedResponse>, ApiError> {
    let id = parse_id(&id, "Book")?;
    let body = parse_non_empty_object(&body)?;
    let changes = BookChanges {
        title: optional_text(&body, "title")?,
        description: optional_text(&body, "description")?,
        author_id: optional_reference(&body, "author_id")?,
        pages: optional_integer(&body, "pages")?,
        year: optional_integer(&body, "year")?,
        genres: optional_genres(&body)?,
    };

    let record = BookRepository::new(&state.db).update(id, changes)?;
    tracing::info!(book_id = id, subject = %subject.subject_id, "book edited");

    Ok(Json(BookUpdatedResponse {
        success: true,
        updated: id,
        book: detail(&state.db, record)?,
    }))
}

#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    tag = "Books",
    security(("bearer" = ["delete:books"])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 401), (status = 403), (status = 404)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id, "Book")?;
    BookRepository::new(&state.db).delete(id)?;
    tracing::info!(book_id = id, subject = %subject.subject_id, "book removed from catalog");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
    }))
}
