// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP clients for the external collaborators.
//!
//! Both collaborators sit behind traits so the services can be exercised
//! with in-memory fakes. The HTTP implementations share one failure
//! mapping: transport failures and timeouts surface as ServiceUnavailable,
//! a downstream 4xx means we sent something it considers invalid
//! (BadRequest), and a downstream 5xx is Internal.

pub mod ledger;
pub mod txbuilder;

pub use ledger::{HttpLedgerClient, Ledger};
pub use txbuilder::{HttpTransactionBuilder, TransactionBuilder};

use crate::error::ApiError;

/// Per-request timeout for both collaborators.
pub const CLIENT_TIMEOUT_SECS: u64 = 5;

/// Map a reqwest transport error to the domain taxonomy.
fn map_transport_error(service: &str, e: reqwest::Error) -> ApiError {
    if e.is_timeout() || e.is_connect() {
        tracing::warn!(service, error = %e, "collaborator unreachable");
        ApiError::service_unavailable(format!("{service} is unavailable"))
    } else {
        ApiError::internal(format!("{service} request failed: {e}"))
    }
}

/// Map a non-success downstream status to the domain taxonomy.
fn map_error_status(service: &str, status: reqwest::StatusCode, body: &str) -> ApiError {
    if status.is_client_error() {
        tracing::warn!(service, %status, body, "collaborator rejected request");
        ApiError::bad_request(format!("{service} rejected the request"))
    } else {
        ApiError::internal(format!("{service} returned {status}: {body}"))
    }
}

/// Execute a POST of `payload`, decoding the JSON response body.
async fn post_json<B, R>(
    client: &reqwest::Client,
    service: &str,
    url: url::Url,
    bearer: Option<&str>,
    payload: &B,
) -> Result<R, ApiError>
where
    B: serde::Serialize + Sync,
    R: serde::de::DeserializeOwned,
{
    let mut request = client.post(url).json(payload);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| map_transport_error(service, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_error_status(service, status, &body));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| ApiError::internal(format!("{service} returned malformed JSON: {e}")))
}
