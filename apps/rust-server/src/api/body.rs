// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request body and path parsing.
//!
//! Bodies are read as raw bytes and inspected field by field:
//!
//! | Input | Status |
//! |-------|--------|
//! | empty body, invalid JSON, not an object | 400 |
//! | required field absent or of the wrong JSON type | 400 |
//! | blank string, non-numeric number, fractional number | 422 |
//! | non-numeric path id | 404 |

use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub type JsonObject = Map<String, Value>;

/// Decode a request body that must be a JSON object.
pub fn parse_object(body: &Bytes) -> Result<JsonObject, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("request body is empty"));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ApiError::bad_request("request body is not a JSON object")),
        Err(e) => Err(ApiError::bad_request(format!("request body is not JSON: {e}"))),
    }
}

/// Same as [`parse_object`], but an empty object is also rejected.
pub fn parse_non_empty_object(body: &Bytes) -> Result<JsonObject, ApiError> {
    let object = parse_object(body)?;
    if object.is_empty() {
        return Err(ApiError::bad_request("request body has no fields"));
    }
    Ok(object)
}

/// Fail 400 unless every field is present. Runs before any value check so
/// a missing field wins over a blank one.
pub fn require_fields(body: &JsonObject, fields: &[&str]) -> Result<(), ApiError> {
    match fields.iter().find(|field| !body.contains_key(**field)) {
        Some(field) => Err(ApiError::bad_request(format!("{field} is required"))),
        None => Ok(()),
    }
}

/// Trimmed, non-blank string field.
pub fn required_text(body: &JsonObject, field: &str) -> Result<String, ApiError> {
    optional_text(body, field)?.ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

pub fn optional_text(body: &JsonObject, field: &str) -> Result<Option<String>, ApiError> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Err(ApiError::unprocessable(format!("{field} is empty")))
            } else {
                Ok(Some(text.to_string()))
            }
        }
        Some(_) => Err(ApiError::bad_request(format!("{field} must be a string"))),
    }
}

/// Integer field given either as a JSON integer or a numeric string.
pub fn required_integer(body: &JsonObject, field: &str) -> Result<i64, ApiError> {
    optional_integer(body, field)?
        .ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

pub fn optional_integer(body: &JsonObject, field: &str) -> Result<Option<i64>, ApiError> {
    let not_numeric = || ApiError::unprocessable(format!("{field} is not an integer"));
    match body.get(field) {
        None => Ok(None),
        Some(Value::Number(number)) => number.as_i64().map(Some).ok_or_else(not_numeric),
        Some(Value::String(text)) => text.trim().parse().map(Some).map_err(|_| not_numeric()),
        Some(_) => Err(ApiError::bad_request(format!("{field} must be a number"))),
    }
}

/// Reference to another entity. A negative id is not a valid reference
/// and is rejected before any lookup.
pub fn required_reference(body: &JsonObject, field: &str) -> Result<u64, ApiError> {
    to_reference(field, required_integer(body, field)?)
}

pub fn optional_reference(body: &JsonObject, field: &str) -> Result<Option<u64>, ApiError> {
    optional_integer(body, field)?
        .map(|id| to_reference(field, id))
        .transpose()
}

fn to_reference(field: &str, id: i64) -> Result<u64, ApiError> {
    u64::try_from(id)
        .map_err(|_| ApiError::unprocessable(format!("{field} {id} is not a valid id")))
}

/// Non-empty list of non-blank genre labels.
pub fn required_genres(body: &JsonObject) -> Result<Vec<String>, ApiError> {
    optional_genres(body)?.ok_or_else(|| ApiError::bad_request("genres is required"))
}

pub fn optional_genres(body: &JsonObject) -> Result<Option<Vec<String>>, ApiError> {
    let items = match body.get("genres") {
        None => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ApiError::bad_request("genres must be a list")),
    };
    if items.is_empty() {
        return Err(ApiError::unprocessable("genres is empty"));
    }

    let mut genres = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(genre) = item else {
            return Err(ApiError::bad_request("genres must hold strings"));
        };
        let genre = genre.trim();
        if genre.is_empty() {
            return Err(ApiError::unprocessable("genre is empty"));
        }
        genres.push(genre.to_string());
    }
    Ok(Some(genres))
}

/// Path id; anything that is not an unsigned integer cannot exist.
pub fn parse_id(raw: &str, what: &str) -> Result<u64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::not_found(format!("{what} {raw}")))
}
