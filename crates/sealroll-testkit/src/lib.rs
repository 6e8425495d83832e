//! # Sealroll Testkit
//!
//! Testing utilities for Sealroll.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known digests and a known export encoding for cross-platform verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Shared seeded keypairs and a ready memory-backed panel
//!
//! ## Golden Vectors
//!
//! ```rust
//! use sealroll_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{name}: {hex}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use sealroll_testkit::generators::{record_from_params, UserParams};
//!
//! proptest! {
//!     #[test]
//!     fn signing_is_deterministic(params: UserParams) {
//!         let signer = sealroll_testkit::TestFixture::new().signer;
//!         let r1 = record_from_params(&signer, &params, 1);
//!         let r2 = record_from_params(&signer, &params, 1);
//!         prop_assert_eq!(r1.signature, r2.signature);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use sealroll_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let payload = fixture.make_payload(&["a@x.com", "b@x.com"]);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{corrupt_signature, shared_keypair, KeyDir, TestFixture};
pub use generators::{record_from_params, UserParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector, GOLDEN_EXPORT_HEX};
