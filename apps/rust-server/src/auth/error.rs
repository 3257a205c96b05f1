// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! The taxonomy is deliberately coarse: most cryptographic failures surface
//! as `invalid_header`, and only expiry and claim mismatches get their own
//! codes. The HTTP status is what separates them:
//!
//! | Status | Failures |
//! |--------|----------|
//! | 400 | token whose payload cannot be parsed into claims |
//! | 401 | missing/malformed header, bad header segment, unknown key, bad signature, expired, wrong issuer/audience |
//! | 403 | capability not granted, authorization code rejected by the provider |
//! | 500 | key-set fetch or code exchange failed in transport |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ErrorEnvelope;

/// Authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("Authorization header is expected")]
    MissingCredential,

    /// Header present but not `Bearer <token>`.
    #[error("{0}")]
    MalformedCredential(&'static str),

    /// Header segment unreadable, no `kid`, or signature rejected.
    #[error("{0}")]
    InvalidHeader(&'static str),

    /// No key in the published key set carries the token's `kid`.
    #[error("Unable to find the appropriate key.")]
    KeyNotFound,

    /// Payload could not be decoded into a claim set at all.
    #[error("Unable to parse authentication token.")]
    UnparseableToken,

    /// `exp` is in the past.
    #[error("Token expired.")]
    TokenExpired,

    /// Issuer, audience or another registered claim did not validate.
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    /// Required capability missing from the `permissions` claim.
    #[error("Missing required permissions")]
    Forbidden,

    /// The provider refused the authorization code.
    #[error("Invalid authorization code")]
    InvalidGrant,

    /// Key set could not be fetched (timeout, transport, bad document).
    #[error("Unable to fetch verification keys: {0}")]
    KeySetUnavailable(String),

    /// Authorization-code exchange failed for a reason other than a rejected grant.
    #[error("Identity provider request failed: {0}")]
    IdentityProvider(String),
}

impl AuthError {
    /// Machine-readable code surfaced next to the description.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "authorization_header_missing",
            AuthError::MalformedCredential(_) => "invalid_authorization_header",
            AuthError::InvalidHeader(_)
            | AuthError::KeyNotFound
            | AuthError::UnparseableToken => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::Forbidden => "forbidden",
            AuthError::InvalidGrant => "invalid_grant",
            AuthError::KeySetUnavailable(_) => "jwks_unavailable",
            AuthError::IdentityProvider(_) => "identity_provider_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UnparseableToken => StatusCode::BAD_REQUEST,
            AuthError::MissingCredential
            | AuthError::MalformedCredential(_)
            | AuthError::InvalidHeader(_)
            | AuthError::KeyNotFound
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden | AuthError::InvalidGrant => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) | AuthError::IdentityProvider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Infrastructure failures are retryable and never the caller's fault.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AuthError::KeySetUnavailable(_) | AuthError::IdentityProvider(_)
        )
    }

    /// Description exposed to clients. Transport details stay in the logs.
    pub fn description(&self) -> String {
        match self {
            AuthError::KeySetUnavailable(_) => "Unable to fetch verification keys".to_string(),
            AuthError::IdentityProvider(_) => "Identity provider unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_infrastructure() {
            tracing::error!(code = self.code(), error = %self, "authentication infrastructure failure");
        } else {
            tracing::warn!(code = self.code(), "authentication rejected");
        }

        let status = self.status_code();
        ErrorEnvelope::for_status(status)
            .with_auth_failure(self.code(), self.description())
            .into_response_with(status)
    }
}
