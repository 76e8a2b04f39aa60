// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::identity::IdentityService;
use crate::kyc::KycService;
use crate::mint::{MintService, WalletService};
use crate::storage::Database;

/// Shared application state handed to every handler.
///
/// Cheap to clone; everything heavyweight sits behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: TokenService,
    pub identity: IdentityService,
    pub kyc: KycService,
    pub mints: MintService,
    pub wallets: WalletService,
}


#[cfg(test)]
mod tests {
    use super::test_support::test_state;
    use crate::models::{
        CreateWalletRequest, KycStatus, MintStatus, Network, SignupRequest, MIN_MINT_AMOUNT,
    };

    /// End-to-end: signup, verify the dispatched code, admin force-verify
    /// of KYC, then a mint request lands Pending with a transaction
    /// reference.
    #[tokio::test]
    async fn onboarding_to_first_mint() {
        let (state, _dir) = test_state();

        let user = state
            .identity
            .signup(SignupRequest {
                email: "a@x.com".to_string(),
                password: "pw12345678".to_string(),
                terms_accepted: true,
                terms_version: None,
            })
            .await
            .unwrap();

        // Verification authenticates directly; no login needed
        let pair = state.identity.verify_code("a@x.com", "123456").await.unwrap();
        assert_eq!(pair.user_id, user.id);

        let status = state
            .kyc
            .mark_status(&user.id, KycStatus::Verified)
            .await
            .unwrap();
        assert_eq!(status.status, KycStatus::Verified);

        let wallet = state
            .wallets
            .create(
                &user.id,
                CreateWalletRequest {
                    address: "0.0.12345".to_string(),
                    network: Network::Hedera,
                },
            )
            .unwrap();

        let mint = state
            .mints
            .request_mint(&user.id, MIN_MINT_AMOUNT, &wallet.id)
            .await
            .unwrap();
        assert_eq!(mint.status, MintStatus::Pending);
        assert!(!mint.tx_reference.is_empty());
    }
}
