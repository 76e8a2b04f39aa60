// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain error taxonomy.
//!
//! Every guard failure is raised as an [`ApiError`] carrying a typed
//! [`ErrorKind`] at the point of detection. The `IntoResponse` impl is the
//! single boundary that translates kinds into HTTP responses; internal
//! detail is logged server-side and never returned to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// The kind of a domain error.
///
/// Kinds map 1:1 to HTTP status classes but are meaningful on their own:
/// services match on kind, not on status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity does not exist or does not belong to the caller.
    NotFound,
    /// Caller-supplied data fails a domain rule.
    BadRequest,
    /// Mint amount below the minimum threshold or malformed.
    InvalidAmount,
    /// Uploaded document is missing, wrong type, or too large.
    InvalidDocument,
    /// Missing, invalid, or expired credential, code, or token.
    Unauthorized,
    /// Authenticated but not entitled to the action.
    Forbidden,
    /// Minting requires a verified KYC status.
    KycNotVerified,
    /// Wallet exists but belongs to a different user.
    WalletMismatch,
    /// Uniqueness violation (duplicate email, KYC already verified).
    Conflict,
    /// A downstream collaborator could not be reached or timed out.
    ServiceUnavailable,
    /// Unexpected failure (downstream 5xx, storage I/O, bug).
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::InvalidAmount => "invalid_amount",
            ErrorKind::InvalidDocument => "invalid_document",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::KycNotVerified => "kyc_not_verified",
            ErrorKind::WalletMismatch => "wallet_mismatch",
            ErrorKind::Conflict => "conflict",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::Internal => "internal_error",
        }
    }

    /// Conventional HTTP status for this kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BadRequest | ErrorKind::InvalidAmount | ErrorKind::InvalidDocument => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden | ErrorKind::KycNotVerified | ErrorKind::WalletMismatch => {
                StatusCode::FORBIDDEN
            }
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A domain error with a typed kind and a user-facing message.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAmount, message)
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDocument, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn kyc_not_verified() -> Self {
        Self::new(
            ErrorKind::KycNotVerified,
            "KYC verification is required before requesting a mint",
        )
    }

    pub fn wallet_mismatch() -> Self {
        Self::new(
            ErrorKind::WalletMismatch,
            "Wallet is not whitelisted for this user",
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Internal error. The detail is logged here; the caller sees a
    /// generic message.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(%detail, "internal error");
        Self::new(ErrorKind::Internal, "An internal error occurred")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.kind.code().to_string(),
        });
        (self.kind.status(), body).into_response()
    }
}

impl From<crate::storage::DbError> for ApiError {
    fn from(e: crate::storage::DbError) -> Self {
        match e {
            crate::storage::DbError::NotFound(entity) => ApiError::not_found(entity),
            crate::storage::DbError::AlreadyExists(entity) => {
                ApiError::conflict(format!("{entity} already exists"))
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<crate::storage::DocumentStoreError> for ApiError {
    fn from(e: crate::storage::DocumentStoreError) -> Self {
        ApiError::internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::InvalidAmount.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::KycNotVerified.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::WalletMismatch.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorKind::ServiceUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn constructors_set_kind_and_message() {
        let err = ApiError::wallet_mismatch();
        assert_eq!(err.kind, ErrorKind::WalletMismatch);

        let err = ApiError::unauthorized("invalid or expired code");
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "invalid or expired code");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::conflict("Email is already registered").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "conflict");
        assert_eq!(body["error"], "Email is already registered");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let response = ApiError::internal("redb: cannot open table").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert!(!body["error"].as_str().unwrap().contains("redb"));
    }
}
