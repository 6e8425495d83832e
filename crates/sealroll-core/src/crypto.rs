//! Cryptographic primitives for Sealroll.
//!
//! Wraps SHA-384 hashing and the base64 signature envelope with strong types.
//! The algorithm parameters are fixed: every signer and verifier, in any
//! language, must agree on them exactly.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha384};
use std::fmt;

/// Digest algorithm used for email hashes and inside the signature scheme.
pub const DIGEST_ALGORITHM: &str = "SHA-384";

/// Length of a raw SHA-384 digest in bytes.
pub const DIGEST_LEN: usize = 48;

/// Length of a hex-encoded email digest.
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// Signature scheme paired with [`DIGEST_ALGORITHM`].
pub const SIGNATURE_SCHEME: &str = "RSASSA-PKCS1-v1_5";

/// RSA modulus size for provisioned keypairs.
pub const RSA_KEY_BITS: usize = 2048;

/// A 48-byte SHA-384 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha384Hash(pub [u8; DIGEST_LEN]);

impl Sha384Hash {
    /// Compute the SHA-384 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha384::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha384Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA384({}...)", &self.to_hex()[..16])
    }
}

/// Hash an email address into the digest string that gets signed.
///
/// SHA-384 over the UTF-8 bytes, lowercase hex, always
/// [`DIGEST_HEX_LEN`] characters.
pub fn hash_email(email: &str) -> String {
    Sha384Hash::hash(email.as_bytes()).to_hex()
}

/// Raw RSA signature bytes, carried as standard padded base64 on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct RecordSignature(pub Vec<u8>);

impl RecordSignature {
    /// Encode as base64 (standard alphabet, padded).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Decode from base64.
    pub fn from_base64(s: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(s).map(Self)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for RecordSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b64 = self.to_base64();
        write!(f, "RecordSig({}...)", &b64[..b64.len().min(16)])
    }
}
