// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the immutable [`Config`]
//! loaded once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding `catalog.redb` | `./data` |
//! | `BOOKSHELF_API_DOMAIN` | Identity provider domain | Required |
//! | `BOOKSHELF_API_AUDIENCE` | Expected JWT audience claim | `bookshelf_api` |
//! | `BOOKSHELF_API_CLIENT_ID` | Client id for the code exchange | empty |
//! | `BOOKSHELF_API_CLIENT_SECRET` | Client secret for the code exchange | empty |
//! | `BOOKSHELF_API_CALLBACK_URL` | Redirect URI for `/login` and `/callback` | `http://localhost:8080/callback` |
//! | `JWKS_URL` | Key set endpoint override | `https://{domain}/.well-known/jwks.json` |
//! | `AUTH_REQUEST_TIMEOUT_SECS` | Timeout for key set fetch and code exchange | `3` |
//! | `JWKS_CACHE_TTL_SECS` | Key set cache TTL, `0` refetches every time | `0` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; HTTPS when both are set | plain HTTP |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const DOMAIN_ENV: &str = "BOOKSHELF_API_DOMAIN";
pub const AUDIENCE_ENV: &str = "BOOKSHELF_API_AUDIENCE";
pub const CLIENT_ID_ENV: &str = "BOOKSHELF_API_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "BOOKSHELF_API_CLIENT_SECRET";
pub const CALLBACK_URL_ENV: &str = "BOOKSHELF_API_CALLBACK_URL";
pub const JWKS_URL_ENV: &str = "JWKS_URL";
pub const AUTH_TIMEOUT_ENV: &str = "AUTH_REQUEST_TIMEOUT_SECS";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const TLS_CERT_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_AUDIENCE: &str = "bookshelf_api";
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:8080/callback";
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Certificate chain and private key, both PEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub domain: String,
    pub audience: String,
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub jwks_url: String,
    pub auth_timeout: Duration,
    pub jwks_cache_ttl: Duration,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            Some(raw) => parse_number::<u16>(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: HOST_ENV,
                    value: host.clone(),
                    reason: e.to_string(),
                })?;

        let domain = var(DOMAIN_ENV).ok_or(ConfigError::Missing(DOMAIN_ENV))?;
        let domain = domain.trim_end_matches('/').to_string();

        let jwks_url = match var(JWKS_URL_ENV) {
            Some(url) => {
                Url::parse(&url).map_err(|e| ConfigError::Invalid {
                    name: JWKS_URL_ENV,
                    value: url.clone(),
                    reason: e.to_string(),
                })?;
                url
            }
            None => format!("https://{domain}/.well-known/jwks.json"),
        };

        let auth_timeout = match var(AUTH_TIMEOUT_ENV) {
            Some(raw) => match parse_number::<u64>(AUTH_TIMEOUT_ENV, &raw)? {
                0 => {
                    return Err(ConfigError::Invalid {
                        name: AUTH_TIMEOUT_ENV,
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    })
                }
                secs => Duration::from_secs(secs),
            },
            None => Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
        };
        let jwks_cache_ttl = match var(JWKS_CACHE_TTL_ENV) {
            Some(raw) => Duration::from_secs(parse_number::<u64>(JWKS_CACHE_TTL_ENV, &raw)?),
            None => Duration::ZERO,
        };

        let tls = match (var(TLS_CERT_ENV), var(TLS_KEY_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref() {
            None => LogFormat::default(),
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(raw) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: raw.to_string(),
                    reason: "expected json or pretty".to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            data_dir: var(DATA_DIR_ENV)
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            domain,
            audience: var(AUDIENCE_ENV).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            client_id: var(CLIENT_ID_ENV).unwrap_or_default(),
            client_secret: var(CLIENT_SECRET_ENV).unwrap_or_default(),
            callback_url: var(CALLBACK_URL_ENV).unwrap_or_else(|| DEFAULT_CALLBACK_URL.to_string()),
            jwks_url,
            auth_timeout,
            jwks_cache_ttl,
            tls,
            log_format,
        })
    }

    /// Expected `iss` claim.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// Identity provider root, the base for `/authorize` and `/oauth/token`.
    pub fn provider_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.issuer()).map_err(|e| ConfigError::Invalid {
            name: DOMAIN_ENV,
            value: self.domain.clone(),
            reason: e.to_string(),
        })
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
