// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The caller's own profile.

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{UpdateProfileRequest, UserResponse},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.identity.get_profile(&user.user_id)?))
}

#[utoipa::path(
    put,
    path = "/v1/users/me",
    request_body = UpdateProfileRequest,
    tag = "Users",
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_me(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.identity.update_profile(&user.user_id, request)?))
}
