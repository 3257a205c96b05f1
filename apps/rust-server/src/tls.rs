// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTPS termination with rustls.
//!
//! The server speaks plain HTTP unless both `TLS_CERT_PATH` and
//! `TLS_KEY_PATH` are set.

use std::net::SocketAddr;
use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;

use crate::config::TlsPaths;

/// Install the ring crypto provider for rustls.
///
/// Must run before any TLS config is built. A second call is a no-op.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

/// Load the PEM certificate chain and private key.
pub async fn load_rustls_config(paths: &TlsPaths) -> std::io::Result<RustlsConfig> {
    let config = RustlsConfig::from_pem_file(&paths.cert, &paths.key).await?;
    tracing::info!(
        cert = %paths.cert.display(),
        key = %paths.key.display(),
        "loaded TLS certificate"
    );
    Ok(config)
}

/// Server handle that starts a graceful shutdown, bounded by `drain`,
/// once `shutdown` is cancelled.
pub fn drain_on_cancel(shutdown: CancellationToken, drain: Duration) -> Handle<SocketAddr> {
    let handle = Handle::new();
    let trigger = handle.clone();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        trigger.graceful_shutdown(Some(drain));
    });
    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_pem_files_are_io_errors() {
        install_crypto_provider();
        let dir = tempfile::tempdir().unwrap();
        let paths = TlsPaths {
            cert: dir.path().join("cert.pem"),
            key: dir.path().join("key.pem"),
        };
        assert!(load_rustls_config(&paths).await.is_err());
    }

    #[test]
    fn installing_twice_is_harmless() {
        install_crypto_provider();
        install_crypto_provider();
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());
    }

    #[tokio::test]
    async fn cancelling_shutdown_stops_the_server() {
        let shutdown = CancellationToken::new();
        let handle = drain_on_cancel(shutdown.clone(), Duration::from_millis(100));
        let server = tokio::spawn(
            axum_server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
                .handle(handle.clone())
                .serve(axum::Router::new().into_make_service()),
        );
        assert!(handle.listening().await.is_some());

        shutdown.cancel();
        let stopped = tokio::time::timeout(Duration::from_secs(5), server).await;
        assert!(matches!(stopped, Ok(Ok(Ok(())))));
    }
}
