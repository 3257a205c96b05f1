// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! [`authenticate`] runs the whole pipeline: credential extraction,
//! signature and claim verification, then the capability check. The
//! [`require_auth`] middleware wraps individual handlers with it and stores
//! the resulting [`AuthenticatedSubject`] in the request extensions, where
//! the `Auth` extractor picks it up. The subject therefore lives exactly as
//! long as the request that carried the credential.
//!
//! ```rust,ignore
//! let guard = AuthGuard::requiring(verifier.clone(), capability::DELETE_BOOKS);
//!
//! let app = Router::new().route(
//!     "/books/{id}",
//!     delete(delete_book.layer(middleware::from_fn_with_state(guard, require_auth))),
//! );
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::bearer_token;
use super::scope::authorize;
use super::verifier::JwtVerifier;
use super::{AuthError, AuthenticatedSubject};

/// Extract, verify and authorize the credential carried by `headers`.
///
/// `required` is the capability the caller needs; `None` only requires a
/// valid credential.
pub async fn authenticate(
    headers: &HeaderMap,
    verifier: &JwtVerifier,
    required: Option<&str>,
) -> Result<AuthenticatedSubject, AuthError> {
    let credential = bearer_token(headers)?;
    let claims = verifier.verify(credential).await?;
    authorize(required, &claims)?;
    Ok(AuthenticatedSubject::from_claims(claims))
}

/// Middleware state: the verifier plus the capability a route needs.
#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<JwtVerifier>,
    required: Option<&'static str>,
}

impl AuthGuard {
    /// Guard that only requires a valid credential.
    pub fn authenticated(verifier: Arc<JwtVerifier>) -> Self {
        Self {
            verifier,
            required: None,
        }
    }

    /// Guard that additionally requires `capability`.
    pub fn requiring(verifier: Arc<JwtVerifier>, capability: &'static str) -> Self {
        Self {
            verifier,
            required: Some(capability),
        }
    }
}

/// Authentication middleware function.
pub async fn require_auth(
    State(guard): State<AuthGuard>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &guard.verifier, guard.required).await {
        Ok(subject) => {
            tracing::debug!(
                subject = %subject.subject_id,
                capability = guard.required.unwrap_or(""),
                "request authenticated"
            );
            request.extensions_mut().insert(subject);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
