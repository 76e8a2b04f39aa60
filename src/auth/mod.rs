// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization.
//!
//! Access tokens are short-lived HS256 JWTs; refresh tokens are opaque
//! random strings persisted server-side and redeemed exactly once.
//! Handlers obtain the caller via the [`Auth`] / [`AdminOnly`] extractors
//! and pass the identity explicitly into the services.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{AccessClaims, AuthenticatedUser};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use roles::Role;
pub use token::TokenService;
