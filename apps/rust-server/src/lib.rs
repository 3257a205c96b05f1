// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bookshelf - Library Catalog Service
//!
//! Books, authors and genres, plus per-user reading shelves, over HTTP/JSON.
//! Catalog mutations and every shelf endpoint are gated by RS256 JWTs issued
//! by an external identity provider.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication and authorization (identity provider JWT)
//! - `storage` - Embedded catalog database (redb)
//! - `config` / `logging` / `tls` - Startup plumbing

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
pub mod tls;
