//! Record verification: the client-side trust check.
//!
//! The stored `email_hash` is never trusted. The digest is recomputed from
//! `email` and the signature is checked against that recomputed value, so a
//! record whose email was swapped after signing fails even when its
//! `email_hash`/`signature` pair is internally consistent.

use tracing::debug;

use crate::crypto::hash_email;
use crate::record::ExportedUser;
use crate::verifier::Verifier;

/// Outcome of checking one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustCheck {
    /// Signature matches the digest recomputed from the email.
    Trusted,
    /// Stored digest differs from the recomputed one.
    DigestMismatch,
    /// Signature does not verify against the recomputed digest.
    BadSignature,
}

impl TrustCheck {
    pub fn is_trusted(self) -> bool {
        self == TrustCheck::Trusted
    }
}

/// Check a record, reporting why it failed if it did.
///
/// A digest mismatch is reported only when the signature also fails; the
/// verdict depends on the recomputed digest alone.
pub fn check_record(record: &ExportedUser, verifier: &Verifier) -> TrustCheck {
    let recomputed = hash_email(&record.email);

    if verifier.verify(&recomputed, &record.signature) {
        return TrustCheck::Trusted;
    }

    if recomputed != record.email_hash {
        TrustCheck::DigestMismatch
    } else {
        TrustCheck::BadSignature
    }
}

/// Whether a record's signature is valid for its email.
pub fn verify_record(record: &ExportedUser, verifier: &Verifier) -> bool {
    let check = check_record(record, verifier);
    if !check.is_trusted() {
        debug!(id = record.id, ?check, "record failed verification");
    }
    check.is_trusted()
}
