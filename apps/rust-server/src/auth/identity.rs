// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity-provider client: hosted login URL and authorization-code exchange.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::AuthError;

/// Form field values for `POST /oauth/token`.
const GRANT_TYPE: &str = "authorization_code";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Client for the identity provider's `/authorize` and `/oauth/token` endpoints.
#[derive(Clone)]
pub struct IdentityProvider {
    authorize_url: Url,
    token_url: Url,
    client_id: String,
    client_secret: String,
    audience: String,
    redirect_uri: String,
    client: reqwest::Client,
}

impl IdentityProvider {
    /// `base_url` is the provider root, e.g. `https://tenant.example.com/`.
    pub fn new(
        base_url: &Url,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        audience: impl Into<String>,
        redirect_uri: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let authorize_url = base_url
            .join("authorize")
            .map_err(|e| AuthError::IdentityProvider(e.to_string()))?;
        let token_url = base_url
            .join("oauth/token")
            .map_err(|e| AuthError::IdentityProvider(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::IdentityProvider(e.to_string()))?;

        Ok(Self {
            authorize_url,
            token_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            audience: audience.into(),
            redirect_uri: redirect_uri.into(),
            client,
        })
    }

    /// Hosted login page the `/login` endpoint redirects to.
    pub fn login_url(&self) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", "openid")
            .append_pair("audience", &self.audience);
        url
    }

    /// Trade an authorization code for an access token.
    ///
    /// A 403 from the provider is a rejected grant; every other failure is
    /// an infrastructure error.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let form = [
            ("grant_type", GRANT_TYPE),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::IdentityProvider(format!("timed out calling {}", self.token_url))
                } else {
                    AuthError::IdentityProvider(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidGrant);
        }
        if !status.is_success() {
            return Err(AuthError::IdentityProvider(format!(
                "HTTP {status} from token endpoint"
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::IdentityProvider(e.to_string()))?;

        body.access_token.ok_or_else(|| {
            AuthError::IdentityProvider("token response carried no access_token".to_string())
        })
    }
}
