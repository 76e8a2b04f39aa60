// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity and session lifecycle.
//!
//! Signup persists the user and dispatches a verification code but issues
//! no tokens; a session begins on successful code verification or on
//! login. Refresh rotates the opaque token exactly once per row; logout
//! revokes it.

pub mod otp;

use std::sync::Arc;

use chrono::Utc;

use crate::auth::{password, TokenService};
use crate::error::ApiError;
use crate::models::{
    LoginRequest, RefreshToken, SignupRequest, TokenPairResponse, UpdateProfileRequest, User,
    UserResponse,
};
use crate::notify::{self, Mailer, Notification};
use crate::storage::{Database, RefreshOutcome};

pub use otp::{CodeSource, OneTimeCodeService, OsRngCodeSource};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Signup, verification, login, refresh, and logout.
#[derive(Clone)]
pub struct IdentityService {
    db: Arc<Database>,
    tokens: TokenService,
    codes: OneTimeCodeService,
    mailer: Arc<dyn Mailer>,
}

impl IdentityService {
    pub fn new(
        db: Arc<Database>,
        tokens: TokenService,
        codes: OneTimeCodeService,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            tokens,
            codes,
            mailer,
        }
    }

    /// Register a new institutional user and dispatch a verification code.
    ///
    /// No tokens are issued here; the caller authenticates by verifying
    /// the code or by logging in afterwards.
    pub async fn signup(&self, request: SignupRequest) -> Result<UserResponse, ApiError> {
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;

        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if !request.terms_accepted {
            return Err(ApiError::bad_request(
                "Terms of service must be accepted to register",
            ));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash: password::hash_password(&request.password)?,
            role: Default::default(),
            kyc_status: Default::default(),
            terms_accepted: true,
            terms_version: request.terms_version,
            first_name: None,
            last_name: None,
            company: None,
            phone: None,
            created_at: Utc::now(),
        };

        self.db.insert_user(&user)?;
        tracing::info!(user_id = %user.id, "user registered");

        self.codes.send(&email).await?;
        Ok(user.into())
    }

    /// Dispatch a fresh verification code.
    ///
    /// Succeeds silently for unknown emails so the endpoint cannot be used
    /// to probe which addresses are registered.
    pub async fn resend_code(&self, email: &str) -> Result<(), ApiError> {
        if self.db.get_user_by_email(email)?.is_none() {
            tracing::debug!("code resend requested for unknown email");
            return Ok(());
        }
        self.codes.send(email).await
    }

    /// Verify a one-time code and start a session.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<TokenPairResponse, ApiError> {
        self.codes.verify(email, code).await?;

        let user = self
            .db
            .get_user_by_email(email)?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired verification code"))?;

        notify::send_best_effort(self.mailer.as_ref(), &user.email, Notification::Welcome).await;
        self.issue_pair(&user)
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPairResponse, ApiError> {
        let user = self
            .db
            .get_user_by_email(request.email.trim())?
            .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

        password::verify_password(&request.password, &user.password_hash)?;
        self.issue_pair(&user)
    }

    /// Rotate a refresh token, returning a new token pair.
    ///
    /// Redemption is exactly-once: the presented token is deleted and
    /// replaced in one storage transaction, so a replayed token fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPairResponse, ApiError> {
        let new_token = self.tokens.issue_refresh_token();
        let outcome = self.db.redeem_refresh_token(
            refresh_token,
            &new_token,
            self.tokens.refresh_expiry(),
            Utc::now(),
        )?;

        let user_id = match outcome {
            RefreshOutcome::Replaced { user_id } => user_id,
            RefreshOutcome::Missing | RefreshOutcome::Expired => {
                return Err(ApiError::unauthorized("Invalid or expired refresh token"));
            }
        };

        let user = self
            .db
            .get_user(&user_id)?
            .ok_or_else(|| ApiError::internal(format!("refresh token owner {user_id} missing")))?;

        let access_token = self
            .tokens
            .issue_access_token(&user.id, user.role)
            .map_err(ApiError::internal)?;

        Ok(TokenPairResponse {
            access_token,
            refresh_token: new_token,
            user_id: user.id,
            expires_in: self.tokens.access_ttl_secs(),
        })
    }

    /// Revoke a refresh token. Idempotent.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        self.db.delete_refresh_token(refresh_token)?;
        Ok(())
    }

    /// The caller's own profile.
    pub fn get_profile(&self, user_id: &str) -> Result<UserResponse, ApiError> {
        let user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(user.into())
    }

    /// Update the caller's profile fields. Absent fields are left alone.
    pub fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, ApiError> {
        let mut user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if let Some(v) = request.first_name {
            user.first_name = Some(v);
        }
        if let Some(v) = request.last_name {
            user.last_name = Some(v);
        }
        if let Some(v) = request.company {
            user.company = Some(v);
        }
        if let Some(v) = request.phone {
            user.phone = Some(v);
        }

        self.db.update_user(&user)?;
        Ok(user.into())
    }

    /// Issue an access token and persist a fresh refresh token.
    fn issue_pair(&self, user: &User) -> Result<TokenPairResponse, ApiError> {
        let access_token = self
            .tokens
            .issue_access_token(&user.id, user.role)
            .map_err(ApiError::internal)?;
        let refresh_token = self.tokens.issue_refresh_token();

        self.db.insert_refresh_token(&RefreshToken {
            token: refresh_token.clone(),
            user_id: user.id.clone(),
            expires_at: self.tokens.refresh_expiry(),
        })?;

        Ok(TokenPairResponse {
            access_token,
            refresh_token,
            user_id: user.id.clone(),
            expires_in: self.tokens.access_ttl_secs(),
        })
    }
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid email address"))
    }
}

#[cfg(test)]
mod tests {
    use super::otp::testing::FixedCodes;
    use super::*;
    use crate::error::ErrorKind;
    use crate::notify::LogMailer;

    fn service(codes: &[&str]) -> (IdentityService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(&dir.path().join("test.redb")).unwrap());
        let tokens = TokenService::new(b"test-secret-at-least-32-bytes-long!");
        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
        let otp = OneTimeCodeService::new(
            Arc::clone(&db),
            Arc::clone(&mailer),
            Arc::new(FixedCodes::new(codes)),
        );
        (IdentityService::new(db, tokens, otp, mailer), dir)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: "pw12345678".to_string(),
            terms_accepted: true,
            terms_version: Some("2026-01".to_string()),
        }
    }

    #[tokio::test]
    async fn signup_verify_login_happy_path() {
        let (svc, _dir) = service(&["123456"]);

        let user = svc.signup(signup_request("A@Example.com")).await.unwrap();
        assert_eq!(user.email, "a@example.com");

        let pair = svc.verify_code("a@example.com", "123456").await.unwrap();
        assert_eq!(pair.user_id, user.id);
        assert_eq!(pair.expires_in, 900);

        let pair = svc
            .login(LoginRequest {
                email: "a@example.com".to_string(),
                password: "pw12345678".to_string(),
            })
            .await
            .unwrap();
        assert!(!pair.access_token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_signup_is_conflict() {
        let (svc, _dir) = service(&["111111", "222222"]);
        svc.signup(signup_request("a@example.com")).await.unwrap();

        let err = svc
            .signup(signup_request("A@EXAMPLE.COM"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn signup_validation_failures() {
        let (svc, _dir) = service(&[]);

        let err = svc.signup(signup_request("not-an-email")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);

        let mut short = signup_request("a@example.com");
        short.password = "short".to_string();
        assert_eq!(svc.signup(short).await.unwrap_err().kind, ErrorKind::BadRequest);

        let mut no_terms = signup_request("a@example.com");
        no_terms.terms_accepted = false;
        assert_eq!(
            svc.signup(no_terms).await.unwrap_err().kind,
            ErrorKind::BadRequest
        );
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (svc, _dir) = service(&["123456"]);
        svc.signup(signup_request("a@example.com")).await.unwrap();

        let err = svc
            .login(LoginRequest {
                email: "a@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        // Unknown email fails identically
        let unknown = svc
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "pw12345678".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(unknown.message, err.message);
    }

    #[tokio::test]
    async fn refresh_rotates_exactly_once() {
        let (svc, _dir) = service(&["123456"]);
        svc.signup(signup_request("a@example.com")).await.unwrap();
        let pair = svc.verify_code("a@example.com", "123456").await.unwrap();

        let rotated = svc.refresh(&pair.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, pair.refresh_token);

        // The original token is spent
        let err = svc.refresh(&pair.refresh_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        // The rotated one still works
        svc.refresh(&rotated.refresh_token).await.unwrap();
    }

    #[tokio::test]
    async fn logout_revokes_refresh_token() {
        let (svc, _dir) = service(&["123456"]);
        svc.signup(signup_request("a@example.com")).await.unwrap();
        let pair = svc.verify_code("a@example.com", "123456").await.unwrap();

        svc.logout(&pair.refresh_token).await.unwrap();
        // Idempotent
        svc.logout(&pair.refresh_token).await.unwrap();

        let err = svc.refresh(&pair.refresh_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn resend_is_silent_for_unknown_email() {
        let (svc, _dir) = service(&[]);
        svc.resend_code("nobody@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn profile_update_preserves_absent_fields() {
        let (svc, _dir) = service(&["123456"]);
        let user = svc.signup(signup_request("a@example.com")).await.unwrap();

        svc.update_profile(
            &user.id,
            UpdateProfileRequest {
                first_name: Some("Ada".to_string()),
                last_name: Some("Lovelace".to_string()),
                company: None,
                phone: None,
            },
        )
        .unwrap();

        let updated = svc
            .update_profile(
                &user.id,
                UpdateProfileRequest {
                    first_name: None,
                    last_name: None,
                    company: Some("Relational".to_string()),
                    phone: None,
                },
            )
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert_eq!(updated.company.as_deref(), Some("Relational"));
    }
}
