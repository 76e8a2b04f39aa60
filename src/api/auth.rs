// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints: signup, verification, login, refresh, logout.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    models::{
        LoginRequest, LogoutRequest, RefreshRequest, ResendCodeRequest, SignupRequest,
        TokenPairResponse, UserResponse, VerifyCodeRequest,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    tag = "Auth",
    responses(
        (status = 201, body = UserResponse),
        (status = 400, description = "Invalid email, password, or terms not accepted"),
        (status = 409, description = "Email already registered"),
        (status = 503, description = "Verification code could not be delivered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.identity.signup(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/v1/auth/verify",
    request_body = VerifyCodeRequest,
    tag = "Auth",
    responses(
        (status = 200, body = TokenPairResponse),
        (status = 401, description = "Invalid or expired verification code")
    )
)]
pub async fn verify_code(
    State(state): State<AppState>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let pair = state
        .identity
        .verify_code(&request.email, &request.code)
        .await?;
    Ok(Json(pair))
}

#[utoipa::path(
    post,
    path = "/v1/auth/resend",
    request_body = ResendCodeRequest,
    tag = "Auth",
    responses(
        (status = 204),
        (status = 503, description = "Verification code could not be delivered")
    )
)]
pub async fn resend_code(
    State(state): State<AppState>,
    Json(request): Json<ResendCodeRequest>,
) -> Result<StatusCode, ApiError> {
    state.identity.resend_code(&request.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = TokenPairResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let pair = state.identity.login(request).await?;
    Ok(Json(pair))
}

#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    request_body = RefreshRequest,
    tag = "Auth",
    responses(
        (status = 200, body = TokenPairResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let pair = state.identity.refresh(&request.refresh_token).await?;
    Ok(Json(pair))
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    request_body = LogoutRequest,
    tag = "Auth",
    responses((status = 204))
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    state.identity.logout(&request.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
