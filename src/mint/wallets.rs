// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet whitelist.
//!
//! A wallet is an (address, network) pair a user has registered as a mint
//! destination. Addresses are validated against the network's grammar at
//! creation and immutable afterwards.

use std::sync::Arc;

use chrono::Utc;

use crate::error::ApiError;
use crate::models::{CreateWalletRequest, Wallet, WalletResponse};
use crate::storage::Database;

#[derive(Clone)]
pub struct WalletService {
    db: Arc<Database>,
}

impl WalletService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Whitelist a wallet for the caller.
    pub fn create(
        &self,
        user_id: &str,
        request: CreateWalletRequest,
    ) -> Result<WalletResponse, ApiError> {
        let address = request.address.trim().to_string();
        if !request.network.validate_address(&address) {
            return Err(ApiError::bad_request(format!(
                "Address is not valid for network {:?}",
                request.network
            )));
        }

        let wallet = Wallet {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            address,
            network: request.network,
            created_at: Utc::now(),
        };
        self.db.insert_wallet(&wallet)?;
        tracing::info!(user_id, wallet_id = %wallet.id, "wallet whitelisted");

        Ok(wallet.into())
    }

    /// The caller's whitelisted wallets, newest first.
    pub fn list(&self, user_id: &str) -> Result<Vec<WalletResponse>, ApiError> {
        let wallets = self.db.list_wallets_for_user(user_id)?;
        Ok(wallets.into_iter().map(WalletResponse::from).collect())
    }
}
