// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Mint - Institutional Token Mint Platform
//!
//! This crate provides the core of an institutional minting platform:
//! identity and session lifecycle (signup, one-time-code verification,
//! login, refresh-token rotation), the KYC and mint state machines with
//! the guards coupling them, and the admin review surface.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tokens, password hashing, and request extractors
//! - `identity` - Signup, verification codes, sessions
//! - `kyc` - KYC review lifecycle and document handling
//! - `mint` - Mint requests, wallet whitelist, status advancement
//! - `clients` - Transaction-builder and ledger collaborators
//! - `notify` - Outbound notifications
//! - `storage` - Embedded database (redb) and document blobs

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod identity;
pub mod kyc;
pub mod mint;
pub mod models;
pub mod notify;
pub mod state;
pub mod storage;
