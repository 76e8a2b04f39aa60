// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-time verification codes.
//!
//! Codes are six decimal digits with a five-minute lifetime, single-use.
//! Resending does not invalidate an earlier code; each row stands alone
//! until it is used or expires.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;

use crate::error::ApiError;
use crate::models::OneTimeCode;
use crate::notify::{Mailer, Notification};
use crate::storage::Database;

/// Code lifetime: 5 minutes.
pub const CODE_TTL_SECS: i64 = 5 * 60;

/// Source of verification codes.
///
/// Injected at construction so tests can substitute a deterministic
/// sequence; production uses [`OsRngCodeSource`].
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> String;
}

/// Codes drawn from the operating system's CSPRNG.
pub struct OsRngCodeSource;

impl CodeSource for OsRngCodeSource {
    fn next_code(&self) -> String {
        let n: u32 = rand::rngs::OsRng.gen_range(0..1_000_000);
        format!("{n:06}")
    }
}

/// Issues and validates one-time codes for an email address.
#[derive(Clone)]
pub struct OneTimeCodeService {
    db: Arc<Database>,
    mailer: Arc<dyn Mailer>,
    source: Arc<dyn CodeSource>,
}

impl OneTimeCodeService {
    pub fn new(db: Arc<Database>, mailer: Arc<dyn Mailer>, source: Arc<dyn CodeSource>) -> Self {
        Self { db, mailer, source }
    }

    /// Generate, persist, and dispatch a fresh code.
    ///
    /// The row is written before dispatch; if delivery fails the caller
    /// sees ServiceUnavailable and the row simply ages out. A resend
    /// creates a new row without touching earlier ones.
    pub async fn send(&self, email: &str) -> Result<(), ApiError> {
        let now = Utc::now();
        let code = self.source.next_code();

        self.db.put_code(&OneTimeCode {
            email: email.to_lowercase(),
            code: code.clone(),
            expires_at: now + Duration::seconds(CODE_TTL_SECS),
            used: false,
            created_at: now,
        })?;

        self.mailer
            .send(email, Notification::VerificationCode { code })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "verification code dispatch failed");
                ApiError::service_unavailable("Could not deliver the verification code")
            })
    }

    /// Validate and consume a code.
    ///
    /// All failure modes (unknown email, wrong code, already used,
    /// expired) collapse into one Unauthorized message so the response
    /// does not reveal which check failed.
    pub async fn verify(&self, email: &str, code: &str) -> Result<(), ApiError> {
        let consumed = self.db.consume_code(email, code, Utc::now())?;
        if consumed {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Invalid or expired verification code"))
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::CodeSource;
    use std::sync::Mutex;

    /// Deterministic code sequence for tests.
    pub struct FixedCodes {
        codes: Mutex<Vec<String>>,
    }

    impl FixedCodes {
        pub fn new(codes: &[&str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().rev().map(|c| c.to_string()).collect()),
            }
        }
    }

    impl CodeSource for FixedCodes {
        fn next_code(&self) -> String {
            self.codes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "000000".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FixedCodes;
    use super::*;
    use crate::error::ErrorKind;
    use crate::notify::LogMailer;

    struct DownMailer;

    #[async_trait::async_trait]
    impl Mailer for DownMailer {
        async fn send(&self, _to: &str, _n: Notification) -> Result<(), ApiError> {
            Err(ApiError::service_unavailable("smtp down"))
        }
    }

    fn service_with(
        mailer: Arc<dyn Mailer>,
        codes: &[&str],
    ) -> (OneTimeCodeService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(&dir.path().join("test.redb")).unwrap());
        let svc = OneTimeCodeService::new(db, mailer, Arc::new(FixedCodes::new(codes)));
        (svc, dir)
    }

    #[tokio::test]
    async fn send_then_verify_consumes_code() {
        let (svc, _dir) = service_with(Arc::new(LogMailer), &["123456"]);

        svc.send("a@example.com").await.unwrap();
        svc.verify("a@example.com", "123456").await.unwrap();

        // Single use
        let err = svc.verify("a@example.com", "123456").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn wrong_code_is_undifferentiated_unauthorized() {
        let (svc, _dir) = service_with(Arc::new(LogMailer), &["123456"]);
        svc.send("a@example.com").await.unwrap();

        let wrong = svc.verify("a@example.com", "654321").await.unwrap_err();
        let unknown = svc.verify("nobody@example.com", "123456").await.unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::Unauthorized);
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn dispatch_failure_is_service_unavailable() {
        let (svc, _dir) = service_with(Arc::new(DownMailer), &["123456"]);

        let err = svc.send("a@example.com").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);

        // The row was persisted before dispatch, so the code still works
        svc.verify("a@example.com", "123456").await.unwrap();
    }

    #[tokio::test]
    async fn resend_keeps_earlier_code_usable() {
        let (svc, _dir) = service_with(Arc::new(LogMailer), &["111111", "222222"]);

        svc.send("a@example.com").await.unwrap();
        svc.send("a@example.com").await.unwrap();

        svc.verify("a@example.com", "111111").await.unwrap();
        svc.verify("a@example.com", "222222").await.unwrap();
    }

    #[test]
    fn os_rng_codes_are_six_digits() {
        let source = OsRngCodeSource;
        for _ in 0..32 {
            let code = source.next_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
