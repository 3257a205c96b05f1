// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RS256 access-token verification against the published key set.
//!
//! ## Steps
//!
//! 1. Read the unverified header and its `kid`
//! 2. Fetch the key set and select the key with that `kid`
//! 3. Verify signature (RS256 only), `exp`, `iss` and `aud`
//! 4. Hand back the decoded [`ClaimSet`]

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::ClaimSet;
use super::jwks::{find_key, rsa_decoding_key, JwksManager};
use super::AuthError;

/// Seconds of clock skew tolerated on `exp`.
const CLOCK_SKEW_LEEWAY: u64 = 0;

/// Verifies bearer credentials issued by the identity provider.
#[derive(Clone)]
pub struct JwtVerifier {
    /// Key-set source
    jwks: JwksManager,
    /// Expected issuer (`https://{domain}/`)
    issuer: String,
    /// Expected audience
    audience: String,
}

impl JwtVerifier {
    pub fn new(jwks: JwksManager, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify `credential` and return its claims.
    pub async fn verify(&self, credential: &str) -> Result<ClaimSet, AuthError> {
        let header = decode_header(credential)
            .map_err(|_| AuthError::InvalidHeader("Error decoding token headers"))?;

        let kid = header
            .kid
            .ok_or(AuthError::InvalidHeader("Authorization malformed."))?;

        let jwks = self.jwks.fetch().await?;
        let jwk = find_key(&jwks, &kid).ok_or(AuthError::KeyNotFound)?;
        let decoding_key = rsa_decoding_key(jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = CLOCK_SKEW_LEEWAY;

        let token_data =
            decode::<ClaimSet>(credential, &decoding_key, &validation).map_err(classify)?;

        Ok(token_data.claims)
    }
}

/// Collapse decode failures into the coarse auth taxonomy.
fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            AuthError::UnparseableToken
        }
        _ => AuthError::InvalidHeader("Unable to verify authentication token."),
    }
}
