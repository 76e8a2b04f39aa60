// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AdminKycItem, AdminMintItem, CreateWalletRequest, KycStatusResponse, LoginRequest,
        LogoutRequest, MarkKycStatusRequest, MintResponse, NewsletterRequest, RefreshRequest,
        RequestMintBody, ResendCodeRequest, SignupRequest, TokenPairResponse,
        UpdateMintStatusRequest, UpdateProfileRequest, UserResponse, VerifyCodeRequest,
        WalletResponse,
    },
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod health;
pub mod kyc;
pub mod mint;
pub mod newsletter;
pub mod users;
pub mod wallets;

/// Body cap for the KYC document upload route: two 10 MiB files plus
/// form overhead.
const KYC_UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/verify", post(auth::verify_code))
        .route("/auth/resend", post(auth::resend_code))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route(
            "/wallets",
            get(wallets::list_wallets).post(wallets::create_wallet),
        )
        .route("/kyc/initiate", post(kyc::initiate))
        .route("/kyc/status", get(kyc::get_status))
        .route(
            "/kyc/documents",
            post(kyc::submit_documents).layer(DefaultBodyLimit::max(KYC_UPLOAD_BODY_LIMIT)),
        )
        .route("/mints", get(mint::list_mints).post(mint::request_mint))
        .route("/mints/{mint_id}", get(mint::get_mint))
        .route("/admin/kyc", get(admin::list_kyc_submissions))
        .route(
            "/admin/kyc/{user_id}/documents/{side}",
            get(admin::get_kyc_document),
        )
        .route("/admin/kyc/{user_id}/status", put(admin::mark_kyc_status))
        .route("/admin/mints", get(admin::list_mints))
        .route(
            "/admin/mints/{mint_id}/status",
            put(admin::update_mint_status),
        )
        .route("/newsletter", post(newsletter::subscribe))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::verify_code,
        auth::resend_code,
        auth::login,
        auth::refresh,
        auth::logout,
        users::get_me,
        users::update_me,
        wallets::create_wallet,
        wallets::list_wallets,
        kyc::initiate,
        kyc::get_status,
        kyc::submit_documents,
        mint::request_mint,
        mint::list_mints,
        mint::get_mint,
        admin::list_kyc_submissions,
        admin::get_kyc_document,
        admin::mark_kyc_status,
        admin::list_mints,
        admin::update_mint_status,
        newsletter::subscribe,
        health::health
    ),
    components(
        schemas(
            SignupRequest,
            VerifyCodeRequest,
            ResendCodeRequest,
            LoginRequest,
            RefreshRequest,
            LogoutRequest,
            UpdateProfileRequest,
            CreateWalletRequest,
            RequestMintBody,
            UpdateMintStatusRequest,
            MarkKycStatusRequest,
            NewsletterRequest,
            TokenPairResponse,
            UserResponse,
            WalletResponse,
            KycStatusResponse,
            MintResponse,
            AdminMintItem,
            AdminKycItem,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Signup, verification, and session lifecycle"),
        (name = "Users", description = "Profile management"),
        (name = "Wallets", description = "Wallet whitelist"),
        (name = "KYC", description = "Identity verification"),
        (name = "Mints", description = "Mint requests"),
        (name = "Admin", description = "Review and status advancement"),
        (name = "Newsletter", description = "Public newsletter signup"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;
