//! Verifier: the boolean trust predicate paired with [`crate::signer::Signer`].
//!
//! Verification never fails loudly. A malformed key, malformed base64, a
//! signature of the wrong length, or a signature from another key all come
//! back as `false`. Rejecting tampered data is a routine outcome here.

use std::fmt;

use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier as _;
use rsa::RsaPublicKey;
use sha2::Sha384;
use tracing::debug;

use crate::crypto::RecordSignature;
use crate::error::CoreError;

/// Checks signatures against a single public key.
///
/// Parse the key once with [`Verifier::from_pem`] and reuse it for every
/// record in an export.
#[derive(Clone)]
pub struct Verifier {
    verifying_key: VerifyingKey<Sha384>,
}

impl Verifier {
    /// Create a verifier from an RSA public key.
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self {
            verifying_key: VerifyingKey::<Sha384>::new(public_key),
        }
    }

    /// Parse an SPKI PEM public key.
    pub fn from_pem(public_key_pem: &str) -> Result<Self, CoreError> {
        let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
            .map_err(|e| CoreError::InvalidPublicKey(e.to_string()))?;
        Ok(Self::new(public_key))
    }

    /// Verify a base64 signature over the bytes of a hex digest string.
    pub fn verify(&self, digest: &str, signature: &str) -> bool {
        let raw = match RecordSignature::from_base64(signature) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "signature is not valid base64");
                return false;
            }
        };
        self.verify_raw(digest, &raw)
    }

    /// Verify a raw signature over the bytes of a hex digest string.
    pub fn verify_raw(&self, digest: &str, signature: &RecordSignature) -> bool {
        let sig = match Signature::try_from(signature.as_bytes()) {
            Ok(sig) => sig,
            Err(e) => {
                debug!(error = %e, "malformed signature bytes");
                return false;
            }
        };
        self.verifying_key.verify(digest.as_bytes(), &sig).is_ok()
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Verifier(rsa-sha384)")
    }
}

/// Verify a signature with a PEM public key, parsing the key on every call.
///
/// Any failure, including an unparseable key, is `false`.
pub fn verify(digest: &str, signature: &str, public_key_pem: &str) -> bool {
    match Verifier::from_pem(public_key_pem) {
        Ok(verifier) => verifier.verify(digest, signature),
        Err(e) => {
            debug!(error = %e, "rejecting signature: unusable public key");
            false
        }
    }
}
