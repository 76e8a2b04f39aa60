// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access-token claims and the authenticated caller representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims embedded in a signed access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role, stored as its lowercase string form
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// The authenticated caller of a request.
///
/// Every core operation takes the caller's identity as an explicit
/// argument; the axum extractor is the only place a token is read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID (token `sub` claim)
    pub user_id: String,
    /// User's role
    pub role: Role,
}

impl AuthenticatedUser {
    /// Build from validated access-token claims.
    ///
    /// An unknown role string degrades to the least-privileged role rather
    /// than failing the request.
    pub fn from_claims(claims: &AccessClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            role: Role::parse(&claims.role).unwrap_or_default(),
        }
    }

    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_user_and_role() {
        let claims = AccessClaims {
            sub: "user-123".to_string(),
            role: "admin".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_000_900,
        };
        let user = AuthenticatedUser::from_claims(&claims);
        assert_eq!(user.user_id, "user-123");
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_admin());
    }

    #[test]
    fn unknown_role_defaults_to_institutional() {
        let claims = AccessClaims {
            sub: "user-123".to_string(),
            role: "superuser".to_string(),
            iat: 0,
            exp: 0,
        };
        let user = AuthenticatedUser::from_claims(&claims);
        assert_eq!(user.role, Role::Institutional);
        assert!(!user.is_admin());
    }
}
