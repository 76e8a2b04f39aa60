// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mint request lifecycle.
//!
//! A mint is created Pending after a fixed guard chain and an external
//! transaction-builder call; every later transition is admin-driven and
//! strictly forward (Pending → Confirmed → Minted → Transferred, with
//! Failed reachable from any non-terminal state). Advancing to Minted or
//! Transferred executes the corresponding ledger call before anything is
//! persisted, so a ledger failure leaves the mint in its previous status.

pub mod wallets;

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::clients::ledger::{Ledger, LedgerMintRequest, LedgerTransferRequest};
use crate::clients::txbuilder::{BuildMintRequest, TransactionBuilder};
use crate::error::ApiError;
use crate::models::{
    AdminMintItem, KycStatus, Mint, MintResponse, MintStatus, MIN_MINT_AMOUNT,
};
use crate::notify::{self, Mailer, Notification};
use crate::storage::Database;

pub use wallets::WalletService;

/// Mint creation, user-scoped queries, and admin status advancement.
#[derive(Clone)]
pub struct MintService {
    db: Arc<Database>,
    txbuilder: Arc<dyn TransactionBuilder>,
    ledger: Arc<dyn Ledger>,
    mailer: Arc<dyn Mailer>,
}

impl MintService {
    pub fn new(
        db: Arc<Database>,
        txbuilder: Arc<dyn TransactionBuilder>,
        ledger: Arc<dyn Ledger>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            txbuilder,
            ledger,
            mailer,
        }
    }

    /// Create a mint request.
    ///
    /// The guards run in a fixed order so callers get deterministic
    /// errors: user, KYC, amount, wallet existence, wallet ownership.
    /// The transaction builder is called before persistence; if it fails
    /// no row is written and the request can be retried.
    pub async fn request_mint(
        &self,
        user_id: &str,
        amount: Decimal,
        wallet_id: &str,
    ) -> Result<MintResponse, ApiError> {
        let user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if user.kyc_status != KycStatus::Verified {
            return Err(ApiError::kyc_not_verified());
        }

        if amount < MIN_MINT_AMOUNT {
            return Err(ApiError::invalid_amount(format!(
                "Mint amount must be at least {MIN_MINT_AMOUNT}"
            )));
        }

        let wallet = self
            .db
            .get_wallet(wallet_id)?
            .ok_or_else(|| ApiError::not_found("Wallet not found"))?;
        if wallet.user_id != user_id {
            return Err(ApiError::wallet_mismatch());
        }

        let built = self
            .txbuilder
            .build_mint(&BuildMintRequest {
                user_id: user_id.to_string(),
                wallet_address: wallet.address.clone(),
                network: wallet.network,
                amount,
            })
            .await?;

        let mint = Mint {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            wallet_id: wallet.id.clone(),
            amount,
            status: MintStatus::Pending,
            initiated_at: Utc::now(),
            tx_reference: built.tx_reference,
            settled_at: None,
            admin_notes: None,
        };
        self.db.insert_mint(&mint)?;
        tracing::info!(user_id, mint_id = %mint.id, %amount, "mint requested");

        notify::send_best_effort(
            self.mailer.as_ref(),
            &user.email,
            Notification::MintStatusChanged {
                mint_id: mint.id.clone(),
                status: mint.status.as_str().to_string(),
            },
        )
        .await;

        Ok(mint.into())
    }

    /// A single mint, scoped to its owner.
    ///
    /// Ownership is part of the lookup predicate: another user's mint id
    /// yields the same NotFound as a nonexistent one.
    pub fn get_status(&self, user_id: &str, mint_id: &str) -> Result<MintResponse, ApiError> {
        let mint = self
            .db
            .get_mint(mint_id)?
            .filter(|m| m.user_id == user_id)
            .ok_or_else(|| ApiError::not_found("Mint not found"))?;
        Ok(mint.into())
    }

    /// The caller's mints, newest first.
    pub fn list_for_user(
        &self,
        user_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<MintResponse>, ApiError> {
        let mints = self.db.list_mints_for_user(user_id, offset, limit)?;
        Ok(mints.into_iter().map(MintResponse::from).collect())
    }

    /// Admin advancement of a mint's status.
    ///
    /// Transitions must move forward in the lifecycle; backward moves,
    /// repeats, and moves out of a terminal status fail with Conflict.
    /// Reaching Minted executes the ledger mint, reaching Transferred
    /// executes the ledger transfer; a terminal status stamps settled_at.
    pub async fn update_status(
        &self,
        mint_id: &str,
        target: MintStatus,
        notes: Option<String>,
    ) -> Result<AdminMintItem, ApiError> {
        let mut mint = self
            .db
            .get_mint(mint_id)?
            .ok_or_else(|| ApiError::not_found("Mint not found"))?;

        if !mint.status.can_advance_to(target) {
            return Err(ApiError::conflict(format!(
                "Cannot move mint from {} to {}",
                mint.status.as_str(),
                target.as_str()
            )));
        }

        match target {
            MintStatus::Minted => {
                self.ledger
                    .execute_mint(&LedgerMintRequest {
                        tx_reference: mint.tx_reference.clone(),
                    })
                    .await?;
            }
            MintStatus::Transferred => {
                let wallet = self
                    .db
                    .get_wallet(&mint.wallet_id)?
                    .ok_or_else(|| ApiError::internal(format!(
                        "mint {mint_id} references missing wallet {}",
                        mint.wallet_id
                    )))?;
                self.ledger
                    .execute_transfer(&LedgerTransferRequest {
                        tx_reference: mint.tx_reference.clone(),
                        destination_address: wallet.address,
                    })
                    .await?;
            }
            _ => {}
        }

        mint.status = target;
        if notes.is_some() {
            mint.admin_notes = notes;
        }
        if target.is_terminal() {
            mint.settled_at = Some(Utc::now());
        }
        self.db.update_mint(&mint)?;
        tracing::info!(mint_id, status = target.as_str(), "mint status advanced");

        if let Some(user) = self.db.get_user(&mint.user_id)? {
            notify::send_best_effort(
                self.mailer.as_ref(),
                &user.email,
                Notification::MintStatusChanged {
                    mint_id: mint.id.clone(),
                    status: target.as_str().to_string(),
                },
            )
            .await;
        }

        Ok(mint.into())
    }

    /// Admin listing, newest first, optionally filtered by status.
    pub fn list_all(
        &self,
        status: Option<MintStatus>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AdminMintItem>, ApiError> {
        let mints = self.db.list_mints(status, offset, limit)?;
        Ok(mints.into_iter().map(AdminMintItem::from).collect())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{CountingLedger, DownBuilder, StubBuilder};
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{Network, User, Wallet};
    use crate::notify::LogMailer;
    use std::sync::atomic::Ordering;

    struct Fixture {
        svc: MintService,
        db: Arc<Database>,
        ledger: Arc<CountingLedger>,
        _dir: tempfile::TempDir,
    }

    fn fixture_with(builder: Arc<dyn TransactionBuilder>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(&dir.path().join("test.redb")).unwrap());
        let ledger = Arc::new(CountingLedger::default());
        let svc = MintService::new(
            Arc::clone(&db),
            builder,
            Arc::clone(&ledger) as Arc<dyn Ledger>,
            Arc::new(LogMailer),
        );
        Fixture {
            svc,
            db,
            ledger,
            _dir: dir,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(StubBuilder))
    }

    fn seed_user(db: &Database, id: &str, kyc: KycStatus) {
        db.insert_user(&User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            role: Default::default(),
            kyc_status: kyc,
            terms_accepted: true,
            terms_version: None,
            first_name: None,
            last_name: None,
            company: None,
            phone: None,
            created_at: Utc::now(),
        })
        .unwrap();
    }

    fn seed_wallet(db: &Database, id: &str, user_id: &str) {
        db.insert_wallet(&Wallet {
            id: id.to_string(),
            user_id: user_id.to_string(),
            address: "0.0.12345".to_string(),
            network: Network::Hedera,
            created_at: Utc::now(),
        })
        .unwrap();
    }

    fn valid_amount() -> Decimal {
        MIN_MINT_AMOUNT
    }

    #[tokio::test]
    async fn happy_path_creates_pending_mint() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");

        let mint = f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();
        assert_eq!(mint.status, MintStatus::Pending);
        assert_eq!(mint.tx_reference, "txref-stub");
        assert!(mint.settled_at.is_none());
    }

    #[tokio::test]
    async fn kyc_gate_blocks_all_unverified_statuses() {
        let f = fixture();
        for (id, status) in [
            ("u-1", KycStatus::Unverified),
            ("u-2", KycStatus::Initiated),
            ("u-3", KycStatus::Submitted),
            ("u-4", KycStatus::Rejected),
        ] {
            seed_user(&f.db, id, status);
            seed_wallet(&f.db, &format!("w-{id}"), id);

            let err = f
                .svc
                .request_mint(id, valid_amount(), &format!("w-{id}"))
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::KycNotVerified);
        }
    }

    #[tokio::test]
    async fn kyc_gate_runs_before_amount_check() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Unverified);

        // Amount is far below the minimum and the wallet does not exist,
        // yet the KYC guard reports first
        let err = f
            .svc
            .request_mint("u-1", Decimal::ONE, "no-such-wallet")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::KycNotVerified);
    }

    #[tokio::test]
    async fn amount_below_minimum_is_invalid() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");

        let below = MIN_MINT_AMOUNT - Decimal::new(1, 2);
        let err = f.svc.request_mint("u-1", below, "w-1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidAmount);
    }

    #[tokio::test]
    async fn foreign_wallet_is_mismatch_not_notfound() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_user(&f.db, "u-2", KycStatus::Verified);
        seed_wallet(&f.db, "w-2", "u-2");

        let err = f
            .svc
            .request_mint("u-1", valid_amount(), "missing")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = f
            .svc
            .request_mint("u-1", valid_amount(), "w-2")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::WalletMismatch);
    }

    #[tokio::test]
    async fn builder_outage_persists_nothing() {
        let f = fixture_with(Arc::new(DownBuilder));
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");

        let err = f
            .svc
            .request_mint("u-1", valid_amount(), "w-1")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);

        assert!(f.svc.list_for_user("u-1", 0, 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_status_is_owner_scoped() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_user(&f.db, "u-2", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");

        let mint = f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();

        f.svc.get_status("u-1", &mint.id).unwrap();
        let err = f.svc.get_status("u-2", &mint.id).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        // Same error as a nonexistent id
        let err2 = f.svc.get_status("u-2", "no-such-mint").unwrap_err();
        assert_eq!(err.message, err2.message);
    }

    #[tokio::test]
    async fn update_status_is_forward_only_and_calls_ledger() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");
        let mint = f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();

        f.svc
            .update_status(&mint.id, MintStatus::Confirmed, Some("ok".to_string()))
            .await
            .unwrap();

        // Backward move is rejected
        let err = f
            .svc
            .update_status(&mint.id, MintStatus::Pending, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        f.svc
            .update_status(&mint.id, MintStatus::Minted, None)
            .await
            .unwrap();
        assert_eq!(f.ledger.mints.load(Ordering::SeqCst), 1);

        let item = f
            .svc
            .update_status(&mint.id, MintStatus::Transferred, None)
            .await
            .unwrap();
        assert_eq!(f.ledger.transfers.load(Ordering::SeqCst), 1);
        assert!(item.settled_at.is_some());

        // Terminal status admits nothing further
        let err = f
            .svc
            .update_status(&mint.id, MintStatus::Failed, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn failed_is_terminal_and_stamps_settled_at() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");
        let mint = f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();

        let item = f
            .svc
            .update_status(&mint.id, MintStatus::Failed, Some("rejected".to_string()))
            .await
            .unwrap();
        assert!(item.settled_at.is_some());
        assert_eq!(item.admin_notes.as_deref(), Some("rejected"));
        // No ledger interaction on failure
        assert_eq!(f.ledger.mints.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_status_touches_only_status_fields() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");
        let mint = f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();

        f.svc
            .update_status(&mint.id, MintStatus::Confirmed, None)
            .await
            .unwrap();

        let read = f.svc.get_status("u-1", &mint.id).unwrap();
        assert_eq!(read.status, MintStatus::Confirmed);
        assert_eq!(read.amount, mint.amount);
        assert_eq!(read.tx_reference, mint.tx_reference);
        assert_eq!(read.wallet_id, mint.wallet_id);
        assert_eq!(read.initiated_at, mint.initiated_at);
        // Completion timestamp only appears for terminal statuses
        assert!(read.settled_at.is_none());
    }

    #[tokio::test]
    async fn advancing_without_notes_keeps_earlier_notes() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");
        let mint = f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();

        f.svc
            .update_status(&mint.id, MintStatus::Confirmed, Some("checked".to_string()))
            .await
            .unwrap();

        let item = f
            .svc
            .update_status(&mint.id, MintStatus::Minted, None)
            .await
            .unwrap();
        assert_eq!(item.admin_notes.as_deref(), Some("checked"));

        // New notes still replace the old ones
        let item = f
            .svc
            .update_status(&mint.id, MintStatus::Transferred, Some("done".to_string()))
            .await
            .unwrap();
        assert_eq!(item.admin_notes.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn duplicate_pending_mints_are_permitted() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");

        f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();
        f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();

        let mints = f.svc.list_for_user("u-1", 0, 10).unwrap();
        assert_eq!(mints.len(), 2);
    }

    #[tokio::test]
    async fn admin_listing_filters_by_status() {
        let f = fixture();
        seed_user(&f.db, "u-1", KycStatus::Verified);
        seed_wallet(&f.db, "w-1", "u-1");

        let a = f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();
        f.svc.request_mint("u-1", valid_amount(), "w-1").await.unwrap();
        f.svc
            .update_status(&a.id, MintStatus::Confirmed, None)
            .await
            .unwrap();

        let pending = f.svc.list_all(Some(MintStatus::Pending), 0, 10).unwrap();
        assert_eq!(pending.len(), 1);

        let all = f.svc.list_all(None, 0, 10).unwrap();
        assert_eq!(all.len(), 2);
    }
}
