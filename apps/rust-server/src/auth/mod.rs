// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless JWT authentication and capability checks for the catalog API.
//!
//! ## Auth Flow
//!
//! 1. The client obtains an access token from the identity provider
//!    (`/login` → hosted page → `/callback?code=` → `{access_token}`)
//! 2. The client sends `Authorization: Bearer <token>`
//! 3. The server:
//!    - Fetches the provider's JWKS over HTTPS
//!    - Verifies the RS256 signature, expiry, issuer and audience
//!    - Checks the route's capability against the `permissions` claim
//!    - Stores the `sub` claim for the current request only
//!
//! ## Security
//!
//! - Catalog mutations and every shelf endpoint require authentication
//! - Only RS256 is accepted
//! - Key-set and token-exchange calls are bounded by a timeout and fail as
//!   500, never as 401

pub mod claims;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod jwks;
pub mod middleware;
pub mod scope;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::{AuthenticatedSubject, ClaimSet};
pub use error::AuthError;
pub use extractor::Auth;
pub use identity::IdentityProvider;
pub use jwks::JwksManager;
pub use middleware::{require_auth, AuthGuard};
pub use scope::capability;
pub use verifier::JwtVerifier;
