// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the authenticated subject.

use serde::{Deserialize, Serialize};

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Default for Audience {
    fn default() -> Self {
        Audience::Many(Vec::new())
    }
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// Verified payload of an access token.
///
/// Lives for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject (user ID)
    pub sub: String,

    /// Granted capabilities, e.g. `delete:books`
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Issuer (`https://{domain}/`)
    pub iss: String,

    /// Audience
    #[serde(default)]
    pub aud: Audience,

    /// Authorized party (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
}

/// Subject identifier extracted from a verified claim set.
///
/// Carried in request extensions for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    /// Canonical subject ID (`sub` claim)
    pub subject_id: String,

    /// Capabilities granted to this subject
    pub permissions: Vec<String>,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl AuthenticatedSubject {
    /// Create from verified claims.
    pub fn from_claims(claims: ClaimSet) -> Self {
        Self {
            subject_id: claims.sub,
            permissions: claims.permissions,
            expires_at: claims.exp,
        }
    }
}
