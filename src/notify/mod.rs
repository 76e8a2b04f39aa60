// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound notifications.
//!
//! Every notification goes through the [`Mailer`] trait. Verification
//! codes are the only delivery the platform depends on: if the code mail
//! cannot be dispatched the signup flow fails with ServiceUnavailable.
//! All other notifications are best-effort; a failure is logged and the
//! triggering operation still succeeds.

use crate::error::ApiError;

/// What is being sent, with the variable parts inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// One-time verification code for signup or re-verification.
    VerificationCode { code: String },
    /// Account is verified and usable.
    Welcome,
    /// KYC review finished or moved.
    KycStatusChanged { status: String },
    /// A user submitted KYC documents (sent to the review inbox).
    KycSubmissionReceived { user_id: String },
    /// A mint request changed status.
    MintStatusChanged { mint_id: String, status: String },
}

/// Delivers notifications to users.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, notification: Notification) -> Result<(), ApiError>;
}

/// Send a notification without letting a delivery failure propagate.
pub async fn send_best_effort(mailer: &dyn Mailer, to: &str, notification: Notification) {
    if let Err(e) = mailer.send(to, notification).await {
        tracing::warn!(to, error = %e, "notification delivery failed");
    }
}

/// Mailer that writes deliveries to the log. Used in development and as
/// the default when no mail provider is configured.
pub struct LogMailer;

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, notification: Notification) -> Result<(), ApiError> {
        match &notification {
            Notification::VerificationCode { code } => {
                tracing::info!(to, code, "mail: verification code");
            }
            Notification::Welcome => {
                tracing::info!(to, "mail: welcome");
            }
            Notification::KycStatusChanged { status } => {
                tracing::info!(to, status, "mail: kyc status changed");
            }
            Notification::KycSubmissionReceived { user_id } => {
                tracing::info!(to, user_id, "mail: kyc submission received");
            }
            Notification::MintStatusChanged { mint_id, status } => {
                tracing::info!(to, mint_id, status, "mail: mint status changed");
            }
        }
        Ok(())
    }
}
