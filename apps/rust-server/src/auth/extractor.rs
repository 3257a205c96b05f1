// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential parsing and the `Auth` extractor.
//!
//! Use the `Auth` extractor in handlers that need the current subject:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(subject): Auth) -> impl IntoResponse {
//!     // subject is AuthenticatedSubject
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::middleware::authenticate;
use super::{AuthError, AuthenticatedSubject};
use crate::state::AppState;

/// Pull the credential out of an `Authorization` header value.
///
/// Pure parsing: the value must be exactly two whitespace-separated tokens,
/// the first of which is `bearer` in any case.
pub fn extract(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingCredential),
    };

    let parts: Vec<&str> = header.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(*token),
        [_, _] => Err(AuthError::MalformedCredential(
            "Authorization header must start with \"Bearer\"",
        )),
        [] | [_] => Err(AuthError::MalformedCredential("Token not found")),
        _ => Err(AuthError::MalformedCredential(
            "Authorization header must be bearer token",
        )),
    }
}

/// [`extract`] applied to a request's headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AuthError::MalformedCredential("Authorization header must be bearer token")
        })?),
        None => None,
    };
    extract(value)
}

/// Extractor for the authenticated subject.
///
/// Reads the subject the guard middleware stored in the request extensions.
/// On routes without a guard it runs the pipeline itself with no required
/// capability.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_shelves(
///     Auth(subject): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<ShelfList>, ApiError> {
///     // subject.subject_id scopes every shelf lookup
/// }
/// ```
pub struct Auth(pub AuthenticatedSubject);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(subject) = parts.extensions.get::<AuthenticatedSubject>().cloned() {
            return Ok(Auth(subject));
        }

        let subject = authenticate(&parts.headers, &state.verifier, None).await?;
        parts.extensions.insert(subject.clone());
        Ok(Auth(subject))
    }
}
