// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    api::{
        body::{
            optional_text, parse_id, parse_non_empty_object, require_fields, required_text,
            JsonObject,
        },
        pagination::{page_number, paginate, PageQuery},
    },
    auth::Auth,
    error::ApiError,
    models::{
        parse_birthday, AuthorBook, AuthorDetail, AuthorListResponse, AuthorResponse,
        AuthorSummary, AuthorUpdatedResponse, CreateAuthorRequest, CreatedResponse,
        DeletedResponse, UpdateAuthorRequest,
    },
    state::AppState,
    storage::{AuthorChanges, AuthorRepository, BookRepository, NewAuthor},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuthorQuery {
    /// Name substring, case-insensitive
    pub search_term: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
}

/// `birthday` as `Y-M-D` or `Y/M/D`; anything else is 422.
fn optional_birthday(body: &JsonObject) -> Result<Option<NaiveDate>, ApiError> {
    optional_text(body, "birthday")?
        .map(|raw| {
            parse_birthday(&raw)
                .ok_or_else(|| ApiError::unprocessable(format!("birthday {raw:?} is not a date")))
        })
        .transpose()
}

#[utoipa::path(
    get,
    path = "/authors",
    params(AuthorQuery),
    tag = "Authors",
    responses((status = 200, body = AuthorListResponse))
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> Result<Json<AuthorListResponse>, ApiError> {
    let search_term = query.search_term.as_deref().filter(|t| !t.is_empty());
    let authors = AuthorRepository::new(&state.db).list(search_term)?;
    let total = authors.len();
    let authors = paginate(authors, page_number(query.page.as_deref()))
        .into_iter()
        .map(AuthorSummary::from)
        .collect();

    Ok(Json(AuthorListResponse {
        success: true,
        authors,
        total,
    }))
}

#[utoipa::path(
    post,
    path = "/authors",
    request_body = CreateAuthorRequest,
    tag = "Authors",
    security(("bearer" = ["post:authors"])),
    responses(
        (status = 201, body = CreatedResponse),
        (status = 400), (status = 401), (status = 403),
        (status = 409, description = "Duplicate name"),
        (status = 422, description = "Blank field or malformed birthday")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Auth(subject): Auth,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let body = parse_non_empty_object(&body)?;
    require_fields(&body, &["name", "description", "birthday"])?;
    let name = required_text(&body, "name")?;
    let description = required_text(&body, "description")?;
    let birthday = optional_birthday(&body)?
        .ok_or_else(|| ApiError::bad_request("birthday is required"))?;

    let record = AuthorRepository::new(&state.db).create(NewAuthor {
        name,
        description,
        birthday,
    })?;
    tracing::info!(author_id = record.id, subject = %subject.subject_id, "author added to catalog");

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
    path = "/authors/{id}",
    params(("id" = String, Path, description = "Author id"), PageQuery),
    tag = "Authors",
    responses((status = 200, body = AuthorResponse), (status = 404))
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<AuthorResponse>, ApiError> {
    let id = parse_id(&id, "Author")?;
    let authors = AuthorRepository::new(&state.db);
    let author = authors.get(id)?;
    let books = authors.books(id)?;
    let total_books = books.len();

    let book_repo = BookRepository::new(&state.db);
    let mut listed = Vec::new();
    for book in paginate(books, page.number()) {
        listed.push(AuthorBook {
            genres: book_repo.genres(book.id)?,
            id: book.id,
            title: book.title,
        });
    }

    Ok(Json(AuthorResponse {
        success: true,
        author: AuthorDetail::new(author, listed, total_books),
    }))
}

#[utoipa::path(
    patch,
    path = "/authors/{id}",
    params(("id" = String, Path, description = "Author id")),
    request_body = UpdateAuthorRequest,
    tag = "Authors",
    security(("bearer" = ["patch:authors"])),
    responses(
        (status = 200, body = AuthorUpdatedResponse),
        (status = 400), (status = 401), (status = 403), (status = 404),
        (status = 409, description = "Duplicate name"),
        (status = 422, description = "Blank field or malformed birthday")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<AuthorUpdatedResponse>, ApiError> {
    let id = parse_id(&id, "Author")?;
    let body = parse_non_empty_object(&body)?;
    let changes = AuthorChanges {
        name: optional_text(&body, "name")?,
        description: optional_text(&body, "description")?,
        birthday: optional_birthday(&body)?,
    };

    let record = AuthorRepository::new(&state.db).update(id, changes)?;
    tracing::info!(author_id = id, subject = %subject.subject_id, "author edited");

    Ok(Json(AuthorUpdatedResponse {
        success: true,
        updated: id,
        author: record.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/authors/{id}",
    params(("id" = String, Path, description = "Author id")),
    tag = "Authors",
    security(("bearer" = ["delete:authors"])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 401), (status = 403), (status = 404),
        (status = 409, description = "Author still has books")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id, "Author")?;
    AuthorRepository::new(&state.db).delete(id)?;
    tracing::info!(author_id = id, subject = %subject.subject_id, "author removed from catalog");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
    }))
}
