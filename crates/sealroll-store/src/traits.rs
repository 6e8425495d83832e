//! Store trait: the abstract interface for user record persistence.
//!
//! This trait allows the panel to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sealroll_core::{NewUserRecord, UserChanges, UserRecord};

use crate::error::Result;

/// Number of records created on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// The UserStore trait: async interface for user record persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Store-assigned ids**: `create` assigns increasing ids in creation order.
/// - **Unique emails**: writing an email another record already holds fails
///   with [`StoreError::DuplicateEmail`](crate::StoreError::DuplicateEmail).
/// - **Opaque signatures**: the store persists `email_hash` and `signature`
///   as given and never recomputes or checks them.
#[async_trait]
pub trait UserStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist a new record and return it with its assigned id.
    async fn create(&self, record: NewUserRecord) -> Result<UserRecord>;

    /// All records, newest first.
    ///
    /// Ordered by `created_at` descending, ties broken by `id` descending.
    async fn find_all(&self) -> Result<Vec<UserRecord>>;

    /// Get a record by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Replace the mutable fields of a record.
    ///
    /// Returns `None` if no record has this id. `id` and `created_at` are kept.
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<UserRecord>>;

    /// Delete a record. Returns whether a record was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Statistics
    // ─────────────────────────────────────────────────────────────────────────

    /// Creation counts per UTC day for days on or after `since`.
    ///
    /// Only days with at least one record appear, ordered by date ascending.
    async fn count_per_day(&self, since: NaiveDate) -> Result<Vec<DailyCount>>;
}
