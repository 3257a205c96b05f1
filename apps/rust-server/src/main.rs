// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use axum::Router;
use tokio_util::sync::CancellationToken;

use bookshelf_rust_server::{
    api::router,
    config::{Config, TlsPaths},
    logging,
    state::AppState,
    tls,
};

/// Time given to in-flight HTTPS requests once shutdown starts.
const HTTPS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_tracing(config.log_format) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    // Must run before any TLS config or HTTPS client is built
    tls::install_crypto_provider();

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialise application state");
            return ExitCode::FAILURE;
        }
    };
    let app = router(state);

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let result = match &config.tls {
        Some(paths) => serve_https(app, config.bind_addr, paths, shutdown).await,
        None => serve_http(app, config.bind_addr, shutdown).await,
    };

    match result {
        Ok(()) => {
            tracing::info!("server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve_http(
    app: Router,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "bookshelf API listening on http (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
}

async fn serve_https(
    app: Router,
    addr: SocketAddr,
    paths: &TlsPaths,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let tls_config = tls::load_rustls_config(paths).await?;

    let handle = tls::drain_on_cancel(shutdown, HTTPS_DRAIN_TIMEOUT);

    tracing::info!(%addr, "bookshelf API listening on https (docs at /docs)");
    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
}

/// Cancel `token` on Ctrl-C or SIGTERM.
async fn wait_for_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
    token.cancel();
}
