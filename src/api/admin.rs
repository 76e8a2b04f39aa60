// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only review surface.
//!
//! Paginated, optionally filtered listings of KYC submissions and mint
//! requests plus the two status-mutation entry points. Everything here
//! requires the Admin role.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::AdminOnly,
    error::ApiError,
    kyc::DocumentSide,
    models::{
        AdminKycItem, AdminMintItem, KycStatus, KycStatusResponse, MarkKycStatusRequest,
        MintStatus, UpdateMintStatusRequest,
    },
    state::AppState,
};

/// Pagination plus an optional mint-status filter.
#[derive(Debug, Deserialize, IntoParams)]
pub struct MintListQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    /// Restrict the listing to one status.
    pub status: Option<MintStatus>,
}

/// Pagination plus an optional review-status filter.
#[derive(Debug, Deserialize, IntoParams)]
pub struct KycListQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    /// Restrict the listing to submissions whose owner is in this status.
    pub status: Option<KycStatus>,
}

#[utoipa::path(
    get,
    path = "/v1/admin/kyc",
    params(KycListQuery),
    tag = "Admin",
    responses(
        (status = 200, body = [AdminKycItem]),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_kyc_submissions(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
    Query(query): Query<KycListQuery>,
) -> Result<Json<Vec<AdminKycItem>>, ApiError> {
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(50).min(200);
    let docs = state.db.list_kyc_documents(query.status, offset, limit)?;

    let mut items = Vec::with_capacity(docs.len());
    for doc in docs {
        // The owning user is never hard-deleted, but tolerate a gap
        let Some(user) = state.db.get_user(&doc.user_id)? else {
            tracing::warn!(document_id = %doc.id, "kyc document without owner");
            continue;
        };
        items.push(AdminKycItem {
            document_id: doc.id,
            user_id: doc.user_id,
            email: user.email,
            full_name: doc.full_name,
            document_type: doc.document_type,
            status: user.kyc_status,
            submitted_at: doc.submitted_at,
        });
    }
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/v1/admin/kyc/{user_id}/documents/{side}",
    params(
        ("user_id" = String, Path, description = "User identifier"),
        ("side" = String, Path, description = "Document face, front or back")
    ),
    tag = "Admin",
    responses(
        (status = 200, body = Vec<u8>, description = "Document bytes", content_type = "application/octet-stream"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No submission for this user")
    )
)]
pub async fn get_kyc_document(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
    Path((user_id, side)): Path<(String, DocumentSide)>,
) -> Result<impl IntoResponse, ApiError> {
    let download = state.kyc.document(&user_id, side).await?;
    Ok((
        [(header::CONTENT_TYPE, download.content_type)],
        download.bytes,
    ))
}

#[utoipa::path(
    put,
    path = "/v1/admin/kyc/{user_id}/status",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = MarkKycStatusRequest,
    tag = "Admin",
    responses(
        (status = 200, body = KycStatusResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn mark_kyc_status(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<MarkKycStatusRequest>,
) -> Result<Json<KycStatusResponse>, ApiError> {
    Ok(Json(state.kyc.mark_status(&user_id, request.status).await?))
}

#[utoipa::path(
    get,
    path = "/v1/admin/mints",
    params(MintListQuery),
    tag = "Admin",
    responses(
        (status = 200, body = [AdminMintItem]),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_mints(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
    Query(query): Query<MintListQuery>,
) -> Result<Json<Vec<AdminMintItem>>, ApiError> {
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(50).min(200);
    Ok(Json(state.mints.list_all(query.status, offset, limit)?))
}

#[utoipa::path(
    put,
    path = "/v1/admin/mints/{mint_id}/status",
    params(("mint_id" = String, Path, description = "Mint identifier")),
    request_body = UpdateMintStatusRequest,
    tag = "Admin",
    responses(
        (status = 200, body = AdminMintItem),
        (status = 404, description = "Mint not found"),
        (status = 409, description = "Transition is not forward in the lifecycle"),
        (status = 503, description = "Ledger unavailable")
    )
)]
pub async fn update_mint_status(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
    Path(mint_id): Path<String>,
    Json(request): Json<UpdateMintStatusRequest>,
) -> Result<Json<AdminMintItem>, ApiError> {
    let item = state
        .mints
        .update_status(&mint_id, request.status, request.notes)
        .await?;
    Ok(Json(item))
}
