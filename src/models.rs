// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain entities and API request/response types.
//!
//! Entities are persisted as JSON values in the embedded database; the
//! `*Response` types are what handlers return (never password hashes,
//! never storage URIs).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

/// Minimum mint amount: 10,000,000.00 of the quoted currency.
pub const MIN_MINT_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 2);

// ============================================================================
// Status enums
// ============================================================================

/// KYC review status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    /// Account created, KYC never started
    Unverified,
    /// User started the KYC flow
    Initiated,
    /// Identity documents submitted, awaiting review
    Submitted,
    /// Approved by an administrator
    Verified,
    /// Rejected by an administrator
    Rejected,
}

impl Default for KycStatus {
    fn default() -> Self {
        Self::Unverified
    }
}

/// Lifecycle status of a mint request.
///
/// The lifecycle is strictly forward: Pending → Confirmed → Minted →
/// Transferred | Failed. Transferred and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MintStatus {
    /// Created, awaiting admin confirmation
    Pending,
    /// Confirmed by an administrator
    Confirmed,
    /// Tokens minted on the ledger
    Minted,
    /// Tokens transferred to the destination wallet (terminal)
    Transferred,
    /// Minting or transfer failed (terminal)
    Failed,
}

impl MintStatus {
    /// Position in the forward-only lifecycle.
    fn rank(&self) -> u8 {
        match self {
            MintStatus::Pending => 0,
            MintStatus::Confirmed => 1,
            MintStatus::Minted => 2,
            MintStatus::Transferred | MintStatus::Failed => 3,
        }
    }

    /// Whether the status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MintStatus::Transferred | MintStatus::Failed)
    }

    /// Whether an admin may advance from `self` to `target`.
    ///
    /// Skipping forward (Pending → Minted) is allowed; moving backward or
    /// out of a terminal state is not.
    pub fn can_advance_to(&self, target: MintStatus) -> bool {
        !self.is_terminal() && target.rank() > self.rank()
    }

    /// Stable string form used in index values and notifications.
    pub fn as_str(&self) -> &'static str {
        match self {
            MintStatus::Pending => "pending",
            MintStatus::Confirmed => "confirmed",
            MintStatus::Minted => "minted",
            MintStatus::Transferred => "transferred",
            MintStatus::Failed => "failed",
        }
    }
}

/// Network a whitelisted wallet lives on.
///
/// The address grammar differs per network and is validated when the
/// wallet is whitelisted; addresses are immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Hedera-style account ids: `shard.realm.num` decimal triplet
    Hedera,
    /// EVM addresses: `0x` + 40 hex characters
    Evm,
}

impl Network {
    /// Validate an address against this network's account-id grammar.
    pub fn validate_address(&self, address: &str) -> bool {
        match self {
            Network::Hedera => {
                let mut parts = address.split('.');
                let valid = (0..3).all(|_| {
                    parts
                        .next()
                        .is_some_and(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
                });
                valid && parts.next().is_none()
            }
            Network::Evm => {
                address.len() == 42
                    && address.starts_with("0x")
                    && address[2..].chars().all(|c| c.is_ascii_hexdigit())
            }
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A registered institutional user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Email address (globally unique, stored lowercase)
    pub email: String,
    /// Argon2 password hash
    pub password_hash: String,
    /// Role for authorization
    pub role: Role,
    /// Current KYC review status
    pub kyc_status: KycStatus,
    /// Whether the user accepted the terms of service
    pub terms_accepted: bool,
    /// Version of the terms the user accepted
    pub terms_version: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A one-time verification code, keyed by `email|code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneTimeCode {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

/// An active session's opaque refresh token row.
///
/// One row per active session; deleted on redemption, logout, or expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// A whitelisted wallet. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub address: String,
    pub network: Network,
    pub created_at: DateTime<Utc>,
}

/// A KYC document submission. Never mutated, only superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycDocument {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub document_type: String,
    pub document_number: String,
    /// Opaque storage URI for the document front (never exposed to users)
    pub front_uri: String,
    /// Opaque storage URI for the document back
    pub back_uri: String,
    pub submitted_at: DateTime<Utc>,
}

/// A mint request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mint {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    /// Fixed-point amount, 2 decimal places
    pub amount: Decimal,
    pub status: MintStatus,
    pub initiated_at: DateTime<Utc>,
    /// Unsigned-transaction reference from the transaction builder
    pub tx_reference: String,
    /// Populated only when the mint reaches Transferred or Failed
    pub settled_at: Option<DateTime<Utc>>,
    /// Free-text notes from the last admin status change
    pub admin_notes: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub terms_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResendCodeRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    pub address: String,
    pub network: Network,
}

/// Mint request body. The amount is a fixed-point decimal string.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RequestMintBody {
    #[schema(value_type = String, example = "10000000.00")]
    pub amount: Decimal,
    pub wallet_id: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMintStatusRequest {
    pub status: MintStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkKycStatusRequest {
    pub status: KycStatus,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewsletterRequest {
    pub email: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Token pair issued on verify, login, and refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Public view of a user (no password hash).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub kyc_status: KycStatus,
    pub terms_accepted: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            kyc_status: user.kyc_status,
            terms_accepted: user.terms_accepted,
            first_name: user.first_name,
            last_name: user.last_name,
            company: user.company,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletResponse {
    pub id: String,
    pub address: String,
    pub network: Network,
    pub created_at: DateTime<Utc>,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            id: wallet.id,
            address: wallet.address,
            network: wallet.network,
            created_at: wallet.created_at,
        }
    }
}

/// KYC status as shown to the user: status plus a document-presence flag,
/// never storage paths.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KycStatusResponse {
    pub status: KycStatus,
    pub has_documents: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MintResponse {
    pub id: String,
    pub wallet_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub status: MintStatus,
    pub initiated_at: DateTime<Utc>,
    pub tx_reference: String,
    pub settled_at: Option<DateTime<Utc>>,
}

impl From<Mint> for MintResponse {
    fn from(mint: Mint) -> Self {
        Self {
            id: mint.id,
            wallet_id: mint.wallet_id,
            amount: mint.amount,
            status: mint.status,
            initiated_at: mint.initiated_at,
            tx_reference: mint.tx_reference,
            settled_at: mint.settled_at,
        }
    }
}

/// Admin view of a mint (includes the owner and notes).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminMintItem {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub status: MintStatus,
    pub initiated_at: DateTime<Utc>,
    pub tx_reference: String,
    pub settled_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

impl From<Mint> for AdminMintItem {
    fn from(mint: Mint) -> Self {
        Self {
            id: mint.id,
            user_id: mint.user_id,
            wallet_id: mint.wallet_id,
            amount: mint.amount,
            status: mint.status,
            initiated_at: mint.initiated_at,
            tx_reference: mint.tx_reference,
            settled_at: mint.settled_at,
            admin_notes: mint.admin_notes,
        }
    }
}

/// Admin view of a KYC submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminKycItem {
    pub document_id: String,
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub document_type: String,
    pub status: KycStatus,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_mint_amount_is_ten_million() {
        assert_eq!(MIN_MINT_AMOUNT.to_string(), "10000000.00");
    }

    #[test]
    fn mint_status_forward_only() {
        assert!(MintStatus::Pending.can_advance_to(MintStatus::Confirmed));
        assert!(MintStatus::Pending.can_advance_to(MintStatus::Minted));
        assert!(MintStatus::Confirmed.can_advance_to(MintStatus::Failed));
        assert!(MintStatus::Minted.can_advance_to(MintStatus::Transferred));

        // Backward and same-rank transitions are rejected
        assert!(!MintStatus::Confirmed.can_advance_to(MintStatus::Pending));
        assert!(!MintStatus::Minted.can_advance_to(MintStatus::Confirmed));
        assert!(!MintStatus::Pending.can_advance_to(MintStatus::Pending));
    }

    #[test]
    fn terminal_statuses_are_immutable() {
        assert!(MintStatus::Transferred.is_terminal());
        assert!(MintStatus::Failed.is_terminal());
        assert!(!MintStatus::Transferred.can_advance_to(MintStatus::Failed));
        assert!(!MintStatus::Failed.can_advance_to(MintStatus::Transferred));
    }

    #[test]
    fn hedera_address_grammar() {
        assert!(Network::Hedera.validate_address("0.0.12345"));
        assert!(Network::Hedera.validate_address("1.2.3"));
        assert!(!Network::Hedera.validate_address("0.0"));
        assert!(!Network::Hedera.validate_address("0.0.12345.6"));
        assert!(!Network::Hedera.validate_address("0.0.abc"));
        assert!(!Network::Hedera.validate_address("0..1"));
        assert!(!Network::Hedera.validate_address(""));
    }

    #[test]
    fn evm_address_grammar() {
        assert!(Network::Evm.validate_address("0x76568BEd5Acf1A5Cd888773C8cAe9ea2a9131A63"));
        assert!(!Network::Evm.validate_address("0x1234"));
        assert!(!Network::Evm.validate_address("76568BEd5Acf1A5Cd888773C8cAe9ea2a9131A63"));
        assert!(!Network::Evm.validate_address("0xZZ568BEd5Acf1A5Cd888773C8cAe9ea2a9131A63"));
    }

    #[test]
    fn user_response_omits_password_hash() {
        let user = User {
            id: "u-1".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "argon2-secret".to_string(),
            role: Role::Institutional,
            kyc_status: KycStatus::Unverified,
            terms_accepted: true,
            terms_version: Some("2026-01".to_string()),
            first_name: None,
            last_name: None,
            company: None,
            phone: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2-secret"));
        assert!(!json.contains("password"));
    }
}
