// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded platform database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized User
//! - `user_email_index`: lowercase email → user_id
//! - `one_time_codes`: composite key (email|code) → serialized OneTimeCode
//! - `refresh_tokens`: opaque token → serialized RefreshToken
//! - `wallets`: wallet_id → serialized Wallet
//! - `wallet_user_index`: composite key (user_id|!timestamp|wallet_id) → network
//! - `kyc_documents`: document_id → serialized KycDocument
//! - `kyc_user_index`: composite key (user_id|!timestamp|document_id) → document_type
//! - `kyc_date_index`: composite key (!timestamp|document_id) → user_id
//! - `mints`: mint_id → serialized Mint
//! - `mint_user_index`: composite key (user_id|!timestamp|mint_id) → status
//! - `mint_date_index`: composite key (!timestamp|mint_id) → status
//! - `newsletter`: lowercase email → subscription timestamp (RFC 3339)
//!
//! Composite keys invert the timestamp so forward range scans return
//! newest-first. Uniqueness checks and their inserts share one write
//! transaction, as does refresh-token redemption, so concurrent callers
//! cannot both succeed.

use std::path::Path;

use chrono::{DateTime, Utc};

use redb::{Database as RedbDatabase, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{
    KycDocument, KycStatus, Mint, MintStatus, OneTimeCode, RefreshToken, User, Wallet,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized User (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: lowercase email → user_id. Guards email uniqueness.
const USER_EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("user_email_index");

/// One-time codes: composite key `email|code` → serialized OneTimeCode.
const ONE_TIME_CODES: TableDefinition<&str, &[u8]> = TableDefinition::new("one_time_codes");

/// Refresh tokens: opaque token string → serialized RefreshToken.
const REFRESH_TOKENS: TableDefinition<&str, &[u8]> = TableDefinition::new("refresh_tokens");

/// Primary table: wallet_id → serialized Wallet.
const WALLETS: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");

/// Index: `user_id|!timestamp_be|wallet_id` → network name.
const WALLET_USER_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("wallet_user_index");

/// Primary table: document_id → serialized KycDocument.
const KYC_DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("kyc_documents");

/// Index: `user_id|!timestamp_be|document_id` → document_type.
const KYC_USER_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("kyc_user_index");

/// Index: `!timestamp_be|document_id` → user_id (admin review queue).
const KYC_DATE_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("kyc_date_index");

/// Primary table: mint_id → serialized Mint.
const MINTS: TableDefinition<&str, &[u8]> = TableDefinition::new("mints");

/// Index: `user_id|!timestamp_be|mint_id` → status string.
const MINT_USER_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("mint_user_index");

/// Index: `!timestamp_be|mint_id` → status string (admin listing/filtering).
const MINT_DATE_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("mint_date_index");

/// Newsletter subscriptions: lowercase email → RFC 3339 timestamp.
const NEWSLETTER: TableDefinition<&str, &str> = TableDefinition::new("newsletter");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Result of redeeming a refresh token.
///
/// `Replaced` carries the owning user's id; the old row is gone and the
/// replacement row is committed atomically, so a token redeems at most once.
#[derive(Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Token was never issued, already redeemed, or revoked.
    Missing,
    /// Token existed but had expired; the row has been removed.
    Expired,
    /// Token redeemed; the replacement is now the active session token.
    Replaced { user_id: String },
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key `owner | inverted_timestamp_be | id`.
///
/// The inverted timestamp ensures newest-first ordering when scanning forward.
fn make_owner_key(owner: &str, timestamp: i64, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner.len() + 1 + 8 + 1 + id.len());
    key.extend_from_slice(owner.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&(!timestamp as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(id.as_bytes());
    key
}

/// Build a prefix for range scanning all entries of one owner.
fn make_owner_prefix(owner: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(owner.len() + 1);
    prefix.extend_from_slice(owner.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for an owner range scan.
fn make_owner_prefix_end(owner: &str) -> Vec<u8> {
    let mut end = Vec::with_capacity(owner.len() + 1 + 20);
    end.extend_from_slice(owner.as_bytes());
    end.push(b'|');
    end.extend_from_slice(&[0xFF; 20]);
    end
}

/// Build a date-index key `inverted_timestamp_be | id` (global newest-first).
fn make_date_key(timestamp: i64, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 1 + id.len());
    key.extend_from_slice(&(!timestamp as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(id.as_bytes());
    key
}

/// Extract the trailing id from a composite index key.
fn extract_id_from_key(key: &[u8]) -> Option<String> {
    let pos = key.iter().rposition(|&b| b == b'|')?;
    String::from_utf8(key[pos + 1..].to_vec()).ok()
}

/// Composite key for the one-time-code table.
fn code_key(email: &str, code: &str) -> String {
    format!("{}|{}", email.to_lowercase(), code)
}

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID platform database.
pub struct Database {
    db: RedbDatabase,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = RedbDatabase::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAIL_INDEX)?;
            let _ = write_txn.open_table(ONE_TIME_CODES)?;
            let _ = write_txn.open_table(REFRESH_TOKENS)?;
            let _ = write_txn.open_table(WALLETS)?;
            let _ = write_txn.open_table(WALLET_USER_INDEX)?;
            let _ = write_txn.open_table(KYC_DOCUMENTS)?;
            let _ = write_txn.open_table(KYC_USER_INDEX)?;
            let _ = write_txn.open_table(KYC_DATE_INDEX)?;
            let _ = write_txn.open_table(MINTS)?;
            let _ = write_txn.open_table(MINT_USER_INDEX)?;
            let _ = write_txn.open_table(MINT_DATE_INDEX)?;
            let _ = write_txn.open_table(NEWSLETTER)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user. The email-uniqueness check and both inserts share
    /// one write transaction.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        let email = user.email.to_lowercase();
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut email_index = write_txn.open_table(USER_EMAIL_INDEX)?;
            if email_index.get(email.as_str())?.is_some() {
                return Err(DbError::AlreadyExists(format!("user {email}")));
            }
            email_index.insert(email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a user by id.
    pub fn get_user(&self, user_id: &str) -> DbResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user by email (case-insensitive).
    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let email = email.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let email_index = read_txn.open_table(USER_EMAIL_INDEX)?;
        let user_id = match email_index.get(email.as_str())? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Overwrite an existing user row. Email is immutable, so the email
    /// index needs no update.
    pub fn update_user(&self, user: &User) -> DbResult<()> {
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            if users.get(user.id.as_str())?.is_none() {
                return Err(DbError::NotFound(format!("user {}", user.id)));
            }
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // =========================================================================
    // One-time codes
    // =========================================================================

    /// Store a one-time code. A fresh code for the same email/code pair
    /// overwrites the previous row.
    pub fn put_code(&self, code: &OneTimeCode) -> DbResult<()> {
        let key = code_key(&code.email, &code.code);
        let json = serde_json::to_vec(code)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ONE_TIME_CODES)?;
            table.insert(key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Atomically consume a one-time code.
    ///
    /// Returns true only when the code exists, is unused, and has not
    /// expired at `now`; the row is marked used in the same transaction, so
    /// two concurrent verifications cannot both succeed.
    pub fn consume_code(&self, email: &str, code: &str, now: DateTime<Utc>) -> DbResult<bool> {
        let key = code_key(email, code);

        let write_txn = self.db.begin_write()?;
        let consumed = {
            let mut table = write_txn.open_table(ONE_TIME_CODES)?;
            let row: Option<OneTimeCode> = match table.get(key.as_str())? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            match row {
                Some(mut otc) if !otc.used && otc.expires_at > now => {
                    otc.used = true;
                    let json = serde_json::to_vec(&otc)?;
                    table.insert(key.as_str(), json.as_slice())?;
                    true
                }
                _ => false,
            }
        };
        write_txn.commit()?;
        Ok(consumed)
    }

    // =========================================================================
    // Refresh tokens
    // =========================================================================

    /// Persist a freshly issued refresh token.
    pub fn insert_refresh_token(&self, token: &RefreshToken) -> DbResult<()> {
        let json = serde_json::to_vec(token)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(REFRESH_TOKENS)?;
            table.insert(token.token.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Redeem a refresh token, rotating it to `new_token` in one write
    /// transaction.
    ///
    /// The old row is removed unconditionally; the replacement is inserted
    /// only when the old token was live. Exactly one of two concurrent
    /// redemptions of the same token observes `Replaced`.
    pub fn redeem_refresh_token(
        &self,
        token: &str,
        new_token: &str,
        new_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> DbResult<RefreshOutcome> {
        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut table = write_txn.open_table(REFRESH_TOKENS)?;
            let old: Option<RefreshToken> = match table.remove(token)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            match old {
                None => RefreshOutcome::Missing,
                Some(row) if row.expires_at <= now => RefreshOutcome::Expired,
                Some(row) => {
                    let replacement = RefreshToken {
                        token: new_token.to_string(),
                        user_id: row.user_id.clone(),
                        expires_at: new_expires_at,
                    };
                    let json = serde_json::to_vec(&replacement)?;
                    table.insert(new_token, json.as_slice())?;
                    RefreshOutcome::Replaced {
                        user_id: row.user_id,
                    }
                }
            }
        };
        write_txn.commit()?;
        Ok(outcome)
    }

    /// Remove a refresh token (logout). Idempotent; returns whether a row
    /// was deleted.
    pub fn delete_refresh_token(&self, token: &str) -> DbResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(REFRESH_TOKENS)?;
            let removed = table.remove(token)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    // =========================================================================
    // Wallets
    // =========================================================================

    /// Insert a wallet and its owner index entry.
    pub fn insert_wallet(&self, wallet: &Wallet) -> DbResult<()> {
        let json = serde_json::to_vec(wallet)?;
        let timestamp = wallet.created_at.timestamp();
        let network = serde_json::to_value(wallet.network)?;
        let network = network.as_str().unwrap_or("unknown").to_string();

        let write_txn = self.db.begin_write()?;
        {
            let mut wallets = write_txn.open_table(WALLETS)?;
            wallets.insert(wallet.id.as_str(), json.as_slice())?;

            let mut index = write_txn.open_table(WALLET_USER_INDEX)?;
            let key = make_owner_key(&wallet.user_id, timestamp, &wallet.id);
            index.insert(key.as_slice(), network.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a wallet by id.
    pub fn get_wallet(&self, wallet_id: &str) -> DbResult<Option<Wallet>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        match table.get(wallet_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All wallets whitelisted by a user, newest first.
    pub fn list_wallets_for_user(&self, user_id: &str) -> DbResult<Vec<Wallet>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(WALLET_USER_INDEX)?;
        let wallets = read_txn.open_table(WALLETS)?;

        let prefix = make_owner_prefix(user_id);
        let end = make_owner_prefix_end(user_id);

        let mut results = Vec::new();
        for entry in index.range(prefix.as_slice()..end.as_slice())? {
            let entry = entry?;
            if let Some(wallet_id) = extract_id_from_key(entry.0.value()) {
                if let Some(value) = wallets.get(wallet_id.as_str())? {
                    results.push(serde_json::from_slice(value.value())?);
                }
            }
        }
        Ok(results)
    }

    // =========================================================================
    // KYC documents
    // =========================================================================

    /// Insert a KYC submission and both its index entries.
    pub fn insert_kyc_document(&self, doc: &KycDocument) -> DbResult<()> {
        let json = serde_json::to_vec(doc)?;
        let timestamp = doc.submitted_at.timestamp();

        let write_txn = self.db.begin_write()?;
        {
            let mut docs = write_txn.open_table(KYC_DOCUMENTS)?;
            docs.insert(doc.id.as_str(), json.as_slice())?;

            let mut user_index = write_txn.open_table(KYC_USER_INDEX)?;
            let key = make_owner_key(&doc.user_id, timestamp, &doc.id);
            user_index.insert(key.as_slice(), doc.document_type.as_str())?;

            let mut date_index = write_txn.open_table(KYC_DATE_INDEX)?;
            let key = make_date_key(timestamp, &doc.id);
            date_index.insert(key.as_slice(), doc.user_id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// The most recent KYC submission for a user, if any.
    pub fn latest_kyc_document_for_user(&self, user_id: &str) -> DbResult<Option<KycDocument>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(KYC_USER_INDEX)?;
        let docs = read_txn.open_table(KYC_DOCUMENTS)?;

        let prefix = make_owner_prefix(user_id);
        let end = make_owner_prefix_end(user_id);

        for entry in index.range(prefix.as_slice()..end.as_slice())? {
            let entry = entry?;
            if let Some(doc_id) = extract_id_from_key(entry.0.value()) {
                if let Some(value) = docs.get(doc_id.as_str())? {
                    return Ok(Some(serde_json::from_slice(value.value())?));
                }
            }
        }
        Ok(None)
    }

    /// Paginated newest-first listing of all KYC submissions, optionally
    /// filtered by the owning user's review status (admin view). The date
    /// index stores the owner id, so the filter loads the user row, not
    /// the document.
    pub fn list_kyc_documents(
        &self,
        status: Option<KycStatus>,
        offset: usize,
        limit: usize,
    ) -> DbResult<Vec<KycDocument>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(KYC_DATE_INDEX)?;
        let docs = read_txn.open_table(KYC_DOCUMENTS)?;
        let users = read_txn.open_table(USERS)?;

        let mut skipped = 0usize;
        let mut results = Vec::with_capacity(limit);
        for entry in index.iter()? {
            if results.len() >= limit {
                break;
            }
            let entry = entry?;
            if let Some(wanted) = status {
                let Some(value) = users.get(entry.1.value())? else {
                    continue;
                };
                let owner: User = serde_json::from_slice(value.value())?;
                if owner.kyc_status != wanted {
                    continue;
                }
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            if let Some(doc_id) = extract_id_from_key(entry.0.value()) {
                if let Some(value) = docs.get(doc_id.as_str())? {
                    results.push(serde_json::from_slice(value.value())?);
                }
            }
        }
        Ok(results)
    }

    // =========================================================================
    // Mints
    // =========================================================================

    /// Insert a mint request and both its index entries.
    pub fn insert_mint(&self, mint: &Mint) -> DbResult<()> {
        let json = serde_json::to_vec(mint)?;
        let timestamp = mint.initiated_at.timestamp();

        let write_txn = self.db.begin_write()?;
        {
            let mut mints = write_txn.open_table(MINTS)?;
            mints.insert(mint.id.as_str(), json.as_slice())?;

            let mut user_index = write_txn.open_table(MINT_USER_INDEX)?;
            let key = make_owner_key(&mint.user_id, timestamp, &mint.id);
            user_index.insert(key.as_slice(), mint.status.as_str())?;

            let mut date_index = write_txn.open_table(MINT_DATE_INDEX)?;
            let key = make_date_key(timestamp, &mint.id);
            date_index.insert(key.as_slice(), mint.status.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a mint by id.
    pub fn get_mint(&self, mint_id: &str) -> DbResult<Option<Mint>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MINTS)?;
        match table.get(mint_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Overwrite a mint row and refresh the status values in both indexes.
    pub fn update_mint(&self, mint: &Mint) -> DbResult<()> {
        let json = serde_json::to_vec(mint)?;
        let timestamp = mint.initiated_at.timestamp();

        let write_txn = self.db.begin_write()?;
        {
            let mut mints = write_txn.open_table(MINTS)?;
            if mints.get(mint.id.as_str())?.is_none() {
                return Err(DbError::NotFound(format!("mint {}", mint.id)));
            }
            mints.insert(mint.id.as_str(), json.as_slice())?;

            let mut user_index = write_txn.open_table(MINT_USER_INDEX)?;
            let key = make_owner_key(&mint.user_id, timestamp, &mint.id);
            user_index.insert(key.as_slice(), mint.status.as_str())?;

            let mut date_index = write_txn.open_table(MINT_DATE_INDEX)?;
            let key = make_date_key(timestamp, &mint.id);
            date_index.insert(key.as_slice(), mint.status.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Paginated newest-first listing of a user's mints.
    pub fn list_mints_for_user(
        &self,
        user_id: &str,
        offset: usize,
        limit: usize,
    ) -> DbResult<Vec<Mint>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(MINT_USER_INDEX)?;
        let mints = read_txn.open_table(MINTS)?;

        let prefix = make_owner_prefix(user_id);
        let end = make_owner_prefix_end(user_id);

        let mut results = Vec::with_capacity(limit);
        for entry in index.range(prefix.as_slice()..end.as_slice())?.skip(offset) {
            if results.len() >= limit {
                break;
            }
            let entry = entry?;
            if let Some(mint_id) = extract_id_from_key(entry.0.value()) {
                if let Some(value) = mints.get(mint_id.as_str())? {
                    results.push(serde_json::from_slice(value.value())?);
                }
            }
        }
        Ok(results)
    }

    /// Paginated newest-first listing of all mints, optionally filtered by
    /// status (admin view). The filter reads the index value, so rows in
    /// other statuses are never deserialized.
    pub fn list_mints(
        &self,
        status: Option<MintStatus>,
        offset: usize,
        limit: usize,
    ) -> DbResult<Vec<Mint>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(MINT_DATE_INDEX)?;
        let mints = read_txn.open_table(MINTS)?;

        let wanted = status.map(|s| s.as_str());
        let mut skipped = 0usize;
        let mut results = Vec::with_capacity(limit);
        for entry in index.iter()? {
            if results.len() >= limit {
                break;
            }
            let entry = entry?;
            if let Some(wanted) = wanted {
                if entry.1.value() != wanted {
                    continue;
                }
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            if let Some(mint_id) = extract_id_from_key(entry.0.value()) {
                if let Some(value) = mints.get(mint_id.as_str())? {
                    results.push(serde_json::from_slice(value.value())?);
                }
            }
        }
        Ok(results)
    }

    // =========================================================================
    // Newsletter
    // =========================================================================

    /// Subscribe an email to the newsletter. Returns false when the email
    /// was already subscribed.
    pub fn subscribe_newsletter(&self, email: &str, now: DateTime<Utc>) -> DbResult<bool> {
        let email = email.to_lowercase();
        let stamp = now.to_rfc3339();

        let write_txn = self.db.begin_write()?;
        let inserted = {
            let mut table = write_txn.open_table(NEWSLETTER)?;
            if table.get(email.as_str())?.is_some() {
                false
            } else {
                table.insert(email.as_str(), stamp.as_str())?;
                true
            }
        };
        write_txn.commit()?;
        Ok(inserted)
    }
}
