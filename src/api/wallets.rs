// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet whitelist endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateWalletRequest, WalletResponse},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/wallets",
    request_body = CreateWalletRequest,
    tag = "Wallets",
    responses(
        (status = 201, body = WalletResponse),
        (status = 400, description = "Address is not valid for the network")
    )
)]
pub async fn create_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<WalletResponse>), ApiError> {
    let wallet = state.wallets.create(&user.user_id, request)?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

#[utoipa::path(
    get,
    path = "/v1/wallets",
    tag = "Wallets",
    responses((status = 200, body = [WalletResponse]))
)]
pub async fn list_wallets(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletResponse>>, ApiError> {
    Ok(Json(state.wallets.list(&user.user_id)?))
}
