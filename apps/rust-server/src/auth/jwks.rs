// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching.
//!
//! ## Behaviour
//!
//! - Every fetch is bounded by the configured timeout
//! - Timeout and transport failures surface as `KeySetUnavailable` (HTTP 500),
//!   never as an authentication failure
//! - By default the key set is refetched on every verification; an optional
//!   TTL cache bounds how long a rotated-out key can remain trusted

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::error::AuthError;

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Key-set source backed by the identity provider's JWKS endpoint.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL (`https://{domain}/.well-known/jwks.json`)
    jwks_url: String,
    /// Cache TTL; `None` refetches on every call
    cache_ttl: Option<Duration>,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a new JWKS manager whose fetches give up after `timeout`.
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            jwks_url: jwks_url.into(),
            cache_ttl: None,
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Cache fetched key sets for `ttl`. A zero TTL disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Fetch the key set, honouring the cache when one is configured.
    pub async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let Some(ttl) = self.cache_ttl else {
            return self.fetch_jwks().await;
        };

        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        self.store(jwks.clone()).await;
        Ok(jwks)
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self.client.get(&self.jwks_url).send().await.map_err(|e| {
            if e.is_timeout() {
                AuthError::KeySetUnavailable(format!("timed out fetching {}", self.jwks_url))
            } else {
                AuthError::KeySetUnavailable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        tracing::debug!(keys = jwks.keys.len(), url = %self.jwks_url, "fetched key set");
        Ok(jwks)
    }

    async fn store(&self, jwks: JwkSet) {
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks,
            fetched_at: Instant::now(),
        });
    }

    /// Force refresh the JWKS cache.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let jwks = self.fetch_jwks().await?;
        self.store(jwks).await;
        Ok(())
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let Some(ttl) = self.cache_ttl else {
            return false;
        };
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .is_some_and(|entry| entry.fetched_at.elapsed() < ttl)
    }
}

/// Find the key carrying `kid`.
///
/// When several entries share the id, the last one in document order wins.
pub fn find_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys
        .iter()
        .rev()
        .find(|k| k.common.key_id.as_deref() == Some(kid))
}

/// Convert an RSA JWK to a DecodingKey.
pub fn rsa_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|_| AuthError::InvalidHeader("Unable to use the verification key.")),
        _ => Err(AuthError::InvalidHeader("Unsupported verification key type.")),
    }
}
