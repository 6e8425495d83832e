//! Client-side verification of an export.
//!
//! Decodes an export, checks every record against the public key shipped in
//! it, and keeps only the records that verify. Rejected records are dropped
//! from the view without raising an error; the caller sees them only as the
//! difference between [`TrustedView::total`] and [`TrustedView::trusted`].

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use sealroll_core::{decode_payload, verify_record, ExportPayload, ExportedUser, Verifier};

use crate::error::{PanelError, Result};

/// The records of an export that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedView {
    /// Verified records, in export order, fields as received.
    pub users: Vec<ExportedUser>,
    /// Number of records in the export, trusted or not.
    pub total: usize,
    /// Public key the records were checked against.
    pub public_key: String,
}

impl TrustedView {
    pub fn trusted(&self) -> usize {
        self.users.len()
    }

    pub fn rejected(&self) -> usize {
        self.total - self.users.len()
    }
}

fn parse_verifier(public_key: &str) -> Option<Verifier> {
    match Verifier::from_pem(public_key) {
        Ok(verifier) => Some(verifier),
        Err(e) => {
            warn!(error = %e, "export carries an unusable public key; trusting nothing");
            None
        }
    }
}

fn log_summary(view: &TrustedView) {
    info!(
        total = view.total,
        trusted = view.trusted(),
        "export verified"
    );
}

/// Verify an already decoded payload.
pub fn verify_payload(payload: ExportPayload) -> TrustedView {
    let total = payload.users.len();
    let users = match parse_verifier(&payload.public_key) {
        Some(verifier) => payload
            .users
            .into_iter()
            .filter(|user| verify_record(user, &verifier))
            .collect(),
        None => Vec::new(),
    };

    let view = TrustedView {
        users,
        total,
        public_key: payload.public_key,
    };
    log_summary(&view);
    view
}

/// Decode an export and verify every record.
///
/// Fails only if the bytes do not decode.
pub fn verify_export(bytes: &[u8]) -> Result<TrustedView> {
    let payload = decode_payload(bytes)?;
    Ok(verify_payload(payload))
}

/// [`verify_export`] with each record checked on the tokio blocking pool.
///
/// Results are collected in export order, so the view is identical to the
/// sequential one.
pub async fn verify_export_parallel(bytes: Bytes) -> Result<TrustedView> {
    let payload = tokio::task::spawn_blocking(move || decode_payload(&bytes))
        .await
        .map_err(|e| PanelError::Task(e.to_string()))??;

    let total = payload.users.len();
    let Some(verifier) = parse_verifier(&payload.public_key) else {
        let view = TrustedView {
            users: Vec::new(),
            total,
            public_key: payload.public_key,
        };
        log_summary(&view);
        return Ok(view);
    };
    let verifier = Arc::new(verifier);

    let handles: Vec<_> = payload
        .users
        .into_iter()
        .map(|user| {
            let verifier = verifier.clone();
            tokio::task::spawn_blocking(move || verify_record(&user, &verifier).then_some(user))
        })
        .collect();

    let mut users = Vec::with_capacity(total);
    for handle in handles {
        let checked = handle
            .await
            .map_err(|e| PanelError::Task(e.to_string()))?;
        if let Some(user) = checked {
            users.push(user);
        }
    }
    debug!(tasks = total, "parallel verification joined");

    let view = TrustedView {
        users,
        total,
        public_key: payload.public_key,
    };
    log_summary(&view);
    Ok(view)
}
