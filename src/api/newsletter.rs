// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public newsletter signup.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::{error::ApiError, models::NewsletterRequest, state::AppState};

#[utoipa::path(
    post,
    path = "/v1/newsletter",
    request_body = NewsletterRequest,
    tag = "Newsletter",
    responses(
        (status = 204, description = "Subscribed"),
        (status = 400, description = "Invalid email address"),
        (status = 409, description = "Email already subscribed")
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<NewsletterRequest>,
) -> Result<StatusCode, ApiError> {
    let email = request.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }

    if !state.db.subscribe_newsletter(&email, Utc::now())? {
        return Err(ApiError::conflict("Email is already subscribed"));
    }
    Ok(StatusCode::NO_CONTENT)
}
