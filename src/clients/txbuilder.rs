// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction-builder collaborator.
//!
//! Called once per mint request, before anything is persisted, to obtain
//! the unsigned-transaction reference that travels with the mint for the
//! rest of its life.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{post_json, CLIENT_TIMEOUT_SECS};
use crate::error::ApiError;
use crate::models::Network;

/// What the mint service asks the builder for.
#[derive(Debug, Clone)]
pub struct BuildMintRequest {
    pub user_id: String,
    pub wallet_address: String,
    pub network: Network,
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct BuildMintResponse {
    /// Opaque unsigned-transaction reference.
    pub tx_reference: String,
}

/// Builds unsigned mint transactions.
#[async_trait::async_trait]
pub trait TransactionBuilder: Send + Sync {
    async fn build_mint(&self, request: &BuildMintRequest) -> Result<BuildMintResponse, ApiError>;
}

/// Wire payload for `POST {base}/api/transactions`.
#[derive(Debug, Serialize)]
struct TransactionPayload {
    message: String,
    description: String,
    account_id: String,
    network: Network,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    start_date: String,
}

#[derive(Debug, Deserialize)]
struct TransactionCreated {
    transaction_id: String,
}

/// HTTP implementation against the transaction-builder service.
pub struct HttpTransactionBuilder {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransactionBuilder {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::internal(format!("failed to build http client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::internal(format!("bad transaction-builder url: {e}")))
    }
}

#[async_trait::async_trait]
impl TransactionBuilder for HttpTransactionBuilder {
    async fn build_mint(&self, request: &BuildMintRequest) -> Result<BuildMintResponse, ApiError> {
        let url = self.endpoint("api/transactions")?;
        let payload = TransactionPayload {
            message: format!("mint {} for {}", request.amount, request.user_id),
            description: "institutional mint request".to_string(),
            account_id: request.wallet_address.clone(),
            network: request.network,
            amount: request.amount,
            start_date: Utc::now().date_naive().to_string(),
        };

        let created: TransactionCreated =
            post_json(&self.client, "transaction builder", url, None, &payload).await?;
        Ok(BuildMintResponse {
            tx_reference: created.transaction_id,
        })
    }
}
