// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mint request endpoints (user-scoped).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{MintResponse, RequestMintBody},
    state::AppState,
};

/// Pagination window, capped so a single request cannot drain the store.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Entries to skip.
    pub offset: Option<usize>,
    /// Page size (default 50, max 200).
    pub limit: Option<usize>,
}

impl PageQuery {
    pub fn window(&self) -> (usize, usize) {
        (self.offset.unwrap_or(0), self.limit.unwrap_or(50).min(200))
    }
}

#[utoipa::path(
    post,
    path = "/v1/mints",
    request_body = RequestMintBody,
    tag = "Mints",
    responses(
        (status = 201, body = MintResponse),
        (status = 400, description = "Amount below the minimum threshold"),
        (status = 403, description = "KYC not verified, or wallet belongs to another user"),
        (status = 404, description = "Wallet not found"),
        (status = 503, description = "Transaction builder unavailable")
    )
)]
pub async fn request_mint(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<RequestMintBody>,
) -> Result<(StatusCode, Json<MintResponse>), ApiError> {
    let mint = state
        .mints
        .request_mint(&user.user_id, request.amount, &request.wallet_id)
        .await?;
    Ok((StatusCode::CREATED, Json(mint)))
}

#[utoipa::path(
    get,
    path = "/v1/mints",
    params(PageQuery),
    tag = "Mints",
    responses((status = 200, body = [MintResponse]))
)]
pub async fn list_mints(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<MintResponse>>, ApiError> {
    let (offset, limit) = page.window();
    Ok(Json(state.mints.list_for_user(&user.user_id, offset, limit)?))
}

#[utoipa::path(
    get,
    path = "/v1/mints/{mint_id}",
    params(("mint_id" = String, Path, description = "Mint identifier")),
    tag = "Mints",
    responses(
        (status = 200, body = MintResponse),
        (status = 404, description = "No such mint for this user")
    )
)]
pub async fn get_mint(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(mint_id): Path<String>,
) -> Result<Json<MintResponse>, ApiError> {
    Ok(Json(state.mints.get_status(&user.user_id, &mint_id)?))
}
