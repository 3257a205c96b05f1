// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hosted login redirect and the authorization-code callback.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::ApiError, models::AccessTokenResponse, state::AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CallbackQuery {
    /// Authorization code issued by the identity provider
    pub code: Option<String>,
}

#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth",
    responses((status = 303, description = "Redirect to the identity provider login page"))
)]
pub async fn login(State(state): State<AppState>) -> Redirect {
    Redirect::to(state.identity.login_url().as_str())
}

#[utoipa::path(
    get,
    path = "/callback",
    params(CallbackQuery),
    tag = "Auth",
    responses(
        (status = 200, body = AccessTokenResponse),
        (status = 400, description = "No authorization code"),
        (status = 403, description = "Authorization code rejected"),
        (status = 500, description = "Identity provider unreachable")
    )
)]
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<AccessTokenResponse>, Response> {
    let code = query
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::bad_request("code is required").into_response())?;

    let access_token = state
        .identity
        .exchange_code(code)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(AccessTokenResponse {
        success: true,
        access_token,
    }))
}
