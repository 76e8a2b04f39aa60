// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - Reviews KYC submissions and advances mint requests
/// - `Institutional` - Normal institutional user, acts on own records only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Institutional user (owns wallets, KYC records, and mint requests)
    Institutional,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Admin, _) => true,
            (Role::Institutional, Role::Institutional) => true,
            _ => false,
        }
    }

    /// Parse role from string (case-insensitive), as stored in token claims.
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "institutional" => Some(Role::Institutional),
            _ => None,
        }
    }
}

impl Default for Role {
    /// Default role is Institutional (least privilege).
    fn default() -> Self {
        Role::Institutional
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Institutional => write!(f, "institutional"),
        }
    }
}
