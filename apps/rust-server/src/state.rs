// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthError, IdentityProvider, JwksManager, JwtVerifier};
use crate::config::{Config, ConfigError};
use crate::storage::{CatalogDatabase, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog database: {0}")]
    Store(#[from] StoreError),

    #[error("key set client: {0}")]
    KeySetClient(#[from] reqwest::Error),

    #[error("identity provider client: {0}")]
    Identity(#[from] AuthError),
}

/// Shared handles for every request. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<CatalogDatabase>,
    pub verifier: Arc<JwtVerifier>,
    pub identity: Arc<IdentityProvider>,
}

impl AppState {
    pub fn new(db: CatalogDatabase, verifier: JwtVerifier, identity: IdentityProvider) -> Self {
        Self {
            db: Arc::new(db),
            verifier: Arc::new(verifier),
            identity: Arc::new(identity),
        }
    }

    /// Open the database and build the identity-provider clients.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let db = CatalogDatabase::open_in(&config.data_dir)?;

        let jwks = JwksManager::new(config.jwks_url.clone(), config.auth_timeout)?
            .with_cache_ttl(config.jwks_cache_ttl);
        let verifier = JwtVerifier::new(jwks, config.issuer(), config.audience.clone());

        let identity = IdentityProvider::new(
            &config.provider_url()?,
            config.client_id.clone(),
            config.client_secret.clone(),
            config.audience.clone(),
            config.callback_url.clone(),
            config.auth_timeout,
        )?;

        Ok(Self::new(db, verifier, identity))
    }

    /// State over a fresh database in `dir`, trusting `stub` as the
    /// identity provider.
    #[cfg(test)]
    pub fn for_tests(dir: &std::path::Path, stub: &crate::auth::testing::ProviderStub) -> Self {
        use crate::auth::testing::{AUDIENCE, ISSUER};
        use std::time::Duration;

        let timeout = Duration::from_secs(3);
        let db = CatalogDatabase::open_in(dir).unwrap();
        let jwks = JwksManager::new(stub.jwks_url(), timeout).unwrap();
        let verifier = JwtVerifier::new(jwks, ISSUER, AUDIENCE);
        let base = url::Url::parse(&format!("{}/", stub.base_url())).unwrap();
        let identity = IdentityProvider::new(
            &base,
            "test-client",
            "test-secret",
            AUDIENCE,
            "http://localhost:8080/callback",
            timeout,
        )
        .unwrap();

        Self::new(db, verifier, identity)
    }
}
