// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! KYC review lifecycle.
//!
//! The user-facing path is forward-only: Unverified → Initiated →
//! Submitted, then an administrator verifies or rejects. The admin
//! override sets any status directly; it is the escape hatch for manual
//! review outcomes.
//!
//! Document blobs go to the document store before the metadata row is
//! written, so a failed upload never leaves a submission that references
//! missing files.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::{KycDocument, KycStatus, KycStatusResponse};
use crate::notify::{self, Mailer, Notification};
use crate::storage::{Database, DocumentStore};

/// Upload size cap per document file: 10 MiB.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];
const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "pdf"];

/// One uploaded document file, as received from the multipart form.
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Which face of the identity document to retrieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSide {
    Front,
    Back,
}

/// A stored document blob ready to serve to a reviewer.
#[derive(Debug)]
pub struct DocumentDownload {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Caller-supplied submission metadata.
pub struct KycSubmission {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub document_type: String,
    pub document_number: String,
}

/// KYC initiation, document submission, and review status.
#[derive(Clone)]
pub struct KycService {
    db: Arc<Database>,
    documents: Arc<dyn DocumentStore>,
    mailer: Arc<dyn Mailer>,
    /// Review inbox for new-submission notifications.
    admin_email: String,
}

impl KycService {
    pub fn new(
        db: Arc<Database>,
        documents: Arc<dyn DocumentStore>,
        mailer: Arc<dyn Mailer>,
        admin_email: String,
    ) -> Self {
        Self {
            db,
            documents,
            mailer,
            admin_email,
        }
    }

    /// Start (or restart) the KYC flow. Idempotent.
    pub fn initiate(&self, user_id: &str) -> Result<KycStatusResponse, ApiError> {
        let mut user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        user.kyc_status = KycStatus::Initiated;
        self.db.update_user(&user)?;

        self.get_status(user_id)
    }

    /// Validate and store a document submission, moving the user to
    /// Submitted.
    ///
    /// Both files are uploaded before the metadata row is written; the
    /// review inbox is notified best-effort afterwards.
    pub async fn submit_documents(
        &self,
        user_id: &str,
        submission: KycSubmission,
        front: UploadedFile,
        back: UploadedFile,
    ) -> Result<KycStatusResponse, ApiError> {
        let mut user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if user.kyc_status == KycStatus::Verified {
            return Err(ApiError::conflict("KYC is already verified"));
        }

        let front_ext = validate_file("front", &front)?;
        let back_ext = validate_file("back", &back)?;

        let doc_id = uuid::Uuid::new_v4().to_string();
        let folder = format!("kyc/{user_id}");
        let front_uri = self
            .documents
            .store(&folder, &format!("{doc_id}_front.{front_ext}"), &front.bytes)
            .await?;
        let back_uri = self
            .documents
            .store(&folder, &format!("{doc_id}_back.{back_ext}"), &back.bytes)
            .await?;

        self.db.insert_kyc_document(&KycDocument {
            id: doc_id.clone(),
            user_id: user_id.to_string(),
            full_name: submission.full_name,
            date_of_birth: submission.date_of_birth,
            document_type: submission.document_type,
            document_number: submission.document_number,
            front_uri,
            back_uri,
            submitted_at: Utc::now(),
        })?;

        user.kyc_status = KycStatus::Submitted;
        self.db.update_user(&user)?;
        tracing::info!(user_id, document_id = %doc_id, "kyc documents submitted");

        notify::send_best_effort(
            self.mailer.as_ref(),
            &self.admin_email,
            Notification::KycSubmissionReceived {
                user_id: user_id.to_string(),
            },
        )
        .await;

        self.get_status(user_id)
    }

    /// Current status plus a document-presence flag. Storage URIs are
    /// never exposed here.
    pub fn get_status(&self, user_id: &str) -> Result<KycStatusResponse, ApiError> {
        let user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let has_documents = self.db.latest_kyc_document_for_user(user_id)?.is_some();
        Ok(KycStatusResponse {
            status: user.kyc_status,
            has_documents,
        })
    }

    /// Fetch one face of the latest submission for admin review. End
    /// users never reach this path.
    pub async fn document(
        &self,
        user_id: &str,
        side: DocumentSide,
    ) -> Result<DocumentDownload, ApiError> {
        let doc = self
            .db
            .latest_kyc_document_for_user(user_id)?
            .ok_or_else(|| ApiError::not_found("No KYC submission for this user"))?;

        let reference = match side {
            DocumentSide::Front => &doc.front_uri,
            DocumentSide::Back => &doc.back_uri,
        };
        let bytes = self.documents.fetch(reference).await?;
        Ok(DocumentDownload {
            content_type: content_type_for(reference),
            bytes,
        })
    }

    /// Admin override: set any status directly and notify the user.
    pub async fn mark_status(
        &self,
        user_id: &str,
        status: KycStatus,
    ) -> Result<KycStatusResponse, ApiError> {
        let mut user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        user.kyc_status = status;
        self.db.update_user(&user)?;
        tracing::info!(user_id, ?status, "kyc status set by admin");

        notify::send_best_effort(
            self.mailer.as_ref(),
            &user.email,
            Notification::KycStatusChanged {
                status: format!("{status:?}").to_lowercase(),
            },
        )
        .await;

        self.get_status(user_id)
    }
}

/// Check one uploaded file against the type and size limits, returning
/// its normalized extension.
fn validate_file(which: &str, file: &UploadedFile) -> Result<String, ApiError> {
    if file.bytes.is_empty() {
        return Err(ApiError::invalid_document(format!(
            "{which} document file is empty"
        )));
    }
    if file.bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(ApiError::invalid_document(format!(
            "{which} document exceeds the 10 MiB limit"
        )));
    }

    let content_type = file.content_type.to_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::invalid_document(format!(
            "{which} document has unsupported content type {content_type}"
        )));
    }

    let extension = file
        .filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ApiError::invalid_document(format!(
            "{which} document has unsupported file extension"
        )));
    }

    Ok(extension)
}

/// Content type for a stored reference, from its extension.
fn content_type_for(reference: &str) -> &'static str {
    match reference.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "image/jpeg",
    }
}
