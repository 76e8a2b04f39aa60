// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger collaborator.
//!
//! Invoked from admin status transitions: advancing a mint to Minted
//! executes the mint on the ledger, advancing to Transferred executes the
//! transfer to the destination wallet. Requests are authenticated with a
//! static bearer token.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{post_json, CLIENT_TIMEOUT_SECS};
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct LedgerMintRequest {
    /// Unsigned-transaction reference from the transaction builder.
    pub tx_reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerTransferRequest {
    pub tx_reference: String,
    pub destination_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerReceipt {
    /// Ledger-side transaction id.
    pub ledger_tx_id: String,
}

/// Executes mint and transfer operations on the ledger.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    async fn execute_mint(&self, request: &LedgerMintRequest) -> Result<LedgerReceipt, ApiError>;

    async fn execute_transfer(
        &self,
        request: &LedgerTransferRequest,
    ) -> Result<LedgerReceipt, ApiError>;
}

/// HTTP implementation against the ledger service.
pub struct HttpLedgerClient {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: String,
}

impl HttpLedgerClient {
    pub fn new(base_url: Url, bearer_token: String) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::internal(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            bearer_token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::internal(format!("bad ledger url: {e}")))
    }
}

#[async_trait::async_trait]
impl Ledger for HttpLedgerClient {
    async fn execute_mint(&self, request: &LedgerMintRequest) -> Result<LedgerReceipt, ApiError> {
        let url = self.endpoint("api/mint")?;
        post_json(&self.client, "ledger", url, Some(&self.bearer_token), request).await
    }

    async fn execute_transfer(
        &self,
        request: &LedgerTransferRequest,
    ) -> Result<LedgerReceipt, ApiError> {
        let url = self.endpoint("api/token/transfer")?;
        post_json(&self.client, "ledger", url, Some(&self.bearer_token), request).await
    }
}
