// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability checks against the `permissions` claim.

use super::{claims::ClaimSet, AuthError};

/// Capabilities issued by the identity provider for catalog mutations.
///
/// Shelf endpoints only need an authenticated subject and use no capability.
pub mod capability {
    pub const POST_BOOKS: &str = "post:books";
    pub const PATCH_BOOKS: &str = "patch:books";
    pub const DELETE_BOOKS: &str = "delete:books";
    pub const POST_AUTHORS: &str = "post:authors";
    pub const PATCH_AUTHORS: &str = "patch:authors";
    pub const DELETE_AUTHORS: &str = "delete:authors";
}

/// Check that `required` is granted by `claims`.
///
/// An absent or empty requirement always passes. Otherwise the capability
/// must be an exact element of `claims.permissions`.
pub fn authorize(required: Option<&str>, claims: &ClaimSet) -> Result<(), AuthError> {
    let Some(required) = required.filter(|r| !r.is_empty()) else {
        return Ok(());
    };

    if claims.permissions.iter().any(|granted| granted == required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Audience;

    fn claims_with(permissions: &[&str]) -> ClaimSet {
        ClaimSet {
            sub: "auth0|librarian".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp: 0,
            iat: None,
            iss: "https://tenant.example.com/".to_string(),
            aud: Audience::default(),
            azp: None,
        }
    }

    #[test]
    fn empty_requirement_always_passes() {
        let claims = claims_with(&[]);
        assert!(authorize(None, &claims).is_ok());
        assert!(authorize(Some(""), &claims).is_ok());
    }

    #[test]
    fn granted_capability_passes() {
        let claims = claims_with(&[capability::POST_BOOKS, capability::PATCH_BOOKS]);
        assert!(authorize(Some(capability::PATCH_BOOKS), &claims).is_ok());
    }

    #[test]
    fn missing_capability_is_forbidden() {
        let claims = claims_with(&[capability::POST_BOOKS]);
        assert_eq!(
            authorize(Some(capability::DELETE_BOOKS), &claims),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn membership_is_exact_not_substring_or_prefix() {
        let claims = claims_with(&["delete:books:all", "post"]);
        assert_eq!(
            authorize(Some(capability::DELETE_BOOKS), &claims),
            Err(AuthError::Forbidden)
        );
        assert_eq!(
            authorize(Some(capability::POST_BOOKS), &claims),
            Err(AuthError::Forbidden)
        );
        assert_eq!(authorize(Some("delete"), &claims), Err(AuthError::Forbidden));
    }
}
