//! # Sealroll Store
//!
//! Storage abstraction for Sealroll. Provides a trait-based interface for
//! user record persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store abstracts record storage behind the [`UserStore`] trait,
//! allowing the panel to be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`UserStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`DailyCount`] - One row of the users-per-day statistic
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sealroll_store::{SqliteStore, UserStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("sealroll.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let users = store.find_all().await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Unique emails**: a second record with the same email is `DuplicateEmail`
//! - **Signatures are opaque**: the store never hashes, signs, or verifies

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DailyCount, UserStore};
