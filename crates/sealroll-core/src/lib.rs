//! # Sealroll Core
//!
//! Pure primitives for Sealroll: email digests, record signatures, and the
//! export codec.
//!
//! Apart from reading and writing key files in [`keys`], this crate does no
//! I/O. Hashing, signing, and verifying are pure functions over their inputs.
//!
//! ## Key Types
//!
//! - [`UserRecord`] - A stored user whose email is bound to a signature
//! - [`Signer`] / [`Verifier`] - RSASSA-PKCS1-v1_5 over SHA-384
//! - [`KeyStore`] - Process-wide cache of the provisioned keypair
//! - [`ExportPayload`] - All records plus the key that verifies them
//! - [`ExportedUser`] - A record in its wire form, fields kept as text
//!
//! ## Encoding
//!
//! Exports use Protocol Buffers. See [`codec`] and `proto/user.proto`.

pub mod codec;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod record;
pub mod signer;
pub mod validation;
pub mod verifier;

pub use codec::{decode_payload, encode_payload, EXPORT_CONTENT_TYPE};
pub use crypto::{hash_email, RecordSignature, Sha384Hash};
pub use error::{CoreError, ValidationError};
pub use keys::{KeyPaths, KeyStore, Keypair};
pub use record::{
    ExportPayload, ExportedUser, NewUserRecord, Role, SignedEmail, Status, UserChanges, UserRecord,
};
pub use signer::Signer;
pub use validation::{check_record, verify_record, TrustCheck};
pub use verifier::{verify, Verifier};
