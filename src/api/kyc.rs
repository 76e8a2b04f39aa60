// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! KYC endpoints.
//!
//! Document submission is a multipart form with text fields (full_name,
//! date_of_birth, document_type, document_number) and two file parts
//! (front, back).

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::NaiveDate;

use crate::{
    auth::Auth,
    error::ApiError,
    kyc::{KycSubmission, UploadedFile},
    models::KycStatusResponse,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/kyc/initiate",
    tag = "KYC",
    responses(
        (status = 200, body = KycStatusResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn initiate(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<KycStatusResponse>, ApiError> {
    Ok(Json(state.kyc.initiate(&user.user_id)?))
}

#[utoipa::path(
    get,
    path = "/v1/kyc/status",
    tag = "KYC",
    responses((status = 200, body = KycStatusResponse))
)]
pub async fn get_status(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<KycStatusResponse>, ApiError> {
    Ok(Json(state.kyc.get_status(&user.user_id)?))
}

#[utoipa::path(
    post,
    path = "/v1/kyc/documents",
    tag = "KYC",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = KycStatusResponse),
        (status = 400, description = "Missing, oversized, or wrong-type document file"),
        (status = 409, description = "KYC is already verified")
    )
)]
pub async fn submit_documents(
    Auth(user): Auth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<KycStatusResponse>, ApiError> {
    let form = parse_submission(multipart).await?;
    let status = state
        .kyc
        .submit_documents(&user.user_id, form.submission, form.front, form.back)
        .await?;
    Ok(Json(status))
}

struct SubmissionForm {
    submission: KycSubmission,
    front: UploadedFile,
    back: UploadedFile,
}

/// Pull the expected fields out of the multipart body. Unknown parts are
/// ignored; missing parts fail with InvalidDocument/BadRequest.
async fn parse_submission(mut multipart: Multipart) -> Result<SubmissionForm, ApiError> {
    let mut full_name = None;
    let mut date_of_birth = None;
    let mut document_type = None;
    let mut document_number = None;
    let mut front = None;
    let mut back = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "full_name" | "date_of_birth" | "document_type" | "document_number" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Unreadable field {name}: {e}")))?;
                match name.as_str() {
                    "full_name" => full_name = Some(value),
                    "date_of_birth" => date_of_birth = Some(value),
                    "document_type" => document_type = Some(value),
                    _ => document_number = Some(value),
                }
            }
            "front" | "back" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_document(format!("Unreadable {name} file: {e}")))?
                    .to_vec();
                let file = UploadedFile {
                    filename,
                    content_type,
                    bytes,
                };
                if name == "front" {
                    front = Some(file);
                } else {
                    back = Some(file);
                }
            }
            _ => {}
        }
    }

    let date_of_birth = date_of_birth
        .ok_or_else(|| ApiError::bad_request("Missing field date_of_birth"))
        .and_then(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request("date_of_birth must be YYYY-MM-DD"))
        })?;

    Ok(SubmissionForm {
        submission: KycSubmission {
            full_name: full_name.ok_or_else(|| ApiError::bad_request("Missing field full_name"))?,
            date_of_birth,
            document_type: document_type
                .ok_or_else(|| ApiError::bad_request("Missing field document_type"))?,
            document_number: document_number
                .ok_or_else(|| ApiError::bad_request("Missing field document_number"))?,
        },
        front: front.ok_or_else(|| ApiError::invalid_document("Missing front document file"))?,
        back: back.ok_or_else(|| ApiError::invalid_document("Missing back document file"))?,
    })
}
