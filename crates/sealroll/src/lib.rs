//! # Sealroll
//!
//! An admin panel whose user records carry a signature over their email.
//!
//! ## Overview
//!
//! - **Create/update**: the email is hashed with SHA-384 and the hex digest is
//!   signed with the server's RSA key before the record is written
//! - **Export**: all records and the public key, encoded as one protobuf
//!   `UserList`
//! - **Verify**: the client recomputes each digest from the email, checks the
//!   signature, and keeps only the records that pass
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sealroll::{verify_export, Panel, PanelConfig, UserInput};
//!
//! async fn example() {
//!     // Keys come from `sealroll-keygen`
//!     let panel = Panel::open(PanelConfig::default()).unwrap();
//!
//!     panel
//!         .create_user(UserInput::new("a@x.com", "user", "active"))
//!         .await
//!         .unwrap();
//!
//!     let export = panel.export().await.unwrap();
//!     let view = verify_export(&export.body).unwrap();
//!     assert_eq!(view.trusted(), view.total);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `sealroll::core` - Hashing, signing, verification, codec
//! - `sealroll::store` - Storage abstraction and SQLite

pub mod config;
pub mod error;
pub mod panel;
pub mod trust;

// Re-export component crates
pub use sealroll_core as core;
pub use sealroll_store as store;

pub use config::PanelConfig;
pub use error::{PanelError, Result};
pub use panel::{ExportResponse, HealthResponse, Panel, PublicKeyResponse, UserInput};
pub use trust::{verify_export, verify_export_parallel, verify_payload, TrustedView};

pub use sealroll_core::{KeyPaths, KeyStore, Keypair, Role, Status, UserRecord};
pub use sealroll_store::{DailyCount, MemoryStore, SqliteStore, UserStore};
