// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistence: the embedded platform database and the document blob store.

pub mod database;
pub mod documents;

pub use database::{Database, DbError, DbResult, RefreshOutcome};
pub use documents::{DocumentStore, DocumentStoreError, LocalDocumentStore};
