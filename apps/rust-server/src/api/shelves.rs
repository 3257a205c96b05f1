// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reading shelves of the authenticated subject.
//!
//! Every handler scopes its lookups by `subject.subject_id`; the `{id}` in
//! the path is the owner-facing `user_based_id`, never the global row id.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{
        body::{parse_id, parse_non_empty_object, required_reference, required_text},
        books::summarize,
        pagination::{paginate, PageQuery},
    },
    auth::Auth,
    error::ApiError,
    models::{
        CreatedResponse, DeletedResponse, RemovedResponse, ShelfDetail, ShelfListResponse,
        ShelfNameRequest, ShelfResponse, ShelfSummary, StoreBookRequest, StoredBookView,
        StoredResponse, UpdatedResponse,
    },
    state::AppState,
    storage::{BookRepository, ShelfRepository},
};

#[utoipa::path(
    get,
    path = "/shelves",
    params(PageQuery),
    tag = "Shelves",
    security(("bearer" = [])),
    responses((status = 200, body = ShelfListResponse), (status = 401))
)]
pub async fn list_shelves(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Query(page): Query<PageQuery>,
) -> Result<Json<ShelfListResponse>, ApiError> {
    let repo = ShelfRepository::new(&state.db);
    let shelves = repo.list(&subject.subject_id)?;
    let total = shelves.len();

    let mut listed = Vec::new();
    for shelf in paginate(shelves, page.number()) {
        let total_books = repo.count_books(&shelf)?;
        listed.push(ShelfSummary::new(shelf, total_books));
    }

    Ok(Json(ShelfListResponse {
        success: true,
        shelves: listed,
        total,
    }))
}

#[utoipa::path(
    post,
    path = "/shelves",
    request_body = ShelfNameRequest,
    tag = "Shelves",
    security(("bearer" = [])),
    responses(
        (status = 201, body = CreatedResponse),
        (status = 400), (status = 401),
        (status = 409, description = "Duplicate shelf name"),
        (status = 422)
    )
)]
pub async fn create_shelf(
    State(state): State<AppState>,
    Auth(subject): Auth,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let body = parse_non_empty_object(&body)?;
    let name = required_text(&body, "name")?;

    let shelf = ShelfRepository::new(&state.db).create(&subject.subject_id, &name)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            created: shelf.user_based_id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/shelves/{id}",
    params(("id" = String, Path, description = "Shelf number"), PageQuery),
    tag = "Shelves",
    security(("bearer" = [])),
    responses((status = 200, body = ShelfResponse), (status = 401), (status = 404))
)]
pub async fn get_shelf(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ShelfResponse>, ApiError> {
    let id = parse_id(&id, "Shelf")?;
    let (shelf, books) = ShelfRepository::new(&state.db).with_books(&subject.subject_id, id)?;
    let total_books = books.len();
    let books = summarize(&state.db, paginate(books, page.number()))?;

    Ok(Json(ShelfResponse {
        success: true,
        shelf: ShelfDetail {
            id: shelf.user_based_id,
            name: shelf.name,
            books,
            total_books,
        },
    }))
}

#[utoipa::path(
    patch,
    path = "/shelves/{id}",
    params(("id" = String, Path, description = "Shelf number")),
    request_body = ShelfNameRequest,
    tag = "Shelves",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UpdatedResponse),
        (status = 400), (status = 401), (status = 404),
        (status = 409, description = "Duplicate shelf name"),
        (status = 422)
    )
)]
pub async fn rename_shelf(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = parse_id(&id, "Shelf")?;
    let body = parse_non_empty_object(&body)?;
    let name = required_text(&body, "name")?;

    ShelfRepository::new(&state.db).rename(&subject.subject_id, id, &name)?;

    Ok(Json(UpdatedResponse {
        success: true,
        updated: id,
    }))
}

#[utoipa::path(
    delete,
    path = "/shelves/{id}",
    params(("id" = String, Path, description = "Shelf number")),
    tag = "Shelves",
    security(("bearer" = [])),
    responses((status = 200, body = DeletedResponse), (status = 401), (status = 404))
)]
pub async fn delete_shelf(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id, "Shelf")?;
    ShelfRepository::new(&state.db).delete(&subject.subject_id, id)?;

    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
    }))
}

#[utoipa::path(
    post,
    path = "/shelves/{id}/books",
    params(("id" = String, Path, description = "Shelf number")),
    request_body = StoreBookRequest,
    tag = "Shelves",
    security(("bearer" = [])),
    responses(
        (status = 201, body = StoredResponse),
        (status = 400), (status = 401),
        (status = 404, description = "Unknown shelf or book"),
        (status = 409, description = "Book already on one of the caller's shelves"),
        (status = 422)
    )
)]
pub async fn store_book(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<StoredResponse>), ApiError> {
    let id = parse_id(&id, "Shelf")?;
    let body = parse_non_empty_object(&body)?;
    let book_id = required_reference(&body, "book_id")?;

    ShelfRepository::new(&state.db).store_book(&subject.subject_id, id, book_id)?;
    let book = BookRepository::new(&state.db).get(book_id)?;
    let book = summarize(&state.db, vec![book])?
        .pop()
        .ok_or_else(|| ApiError::internal(format!("Book {book_id} vanished after storing")))?;

    Ok((
        StatusCode::CREATED,
        Json(StoredResponse {
            success: true,
            stored: StoredBookView { book, shelf: id },
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/shelves/{id}/books/{book_id}",
    params(
        ("id" = String, Path, description = "Shelf number"),
        ("book_id" = String, Path, description = "Book id")
    ),
    tag = "Shelves",
    security(("bearer" = [])),
    responses(
        (status = 200, body = RemovedResponse),
        (status = 401),
        (status = 404, description = "Unknown shelf, or book not stored")
    )
)]
pub async fn remove_book(
    State(state): State<AppState>,
    Auth(subject): Auth,
    Path((id, book_id)): Path<(String, String)>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let id = parse_id(&id, "Shelf")?;
    let book_id = parse_id(&book_id, "Book")?;
    ShelfRepository::new(&state.db).remove_book(&subject.subject_id, id, book_id)?;

    Ok(Json(RemovedResponse {
        success: true,
        removed: book_id,
    }))
}
