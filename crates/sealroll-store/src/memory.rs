//! In-memory implementation of the UserStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use sealroll_core::{NewUserRecord, UserChanges, UserRecord};

use crate::error::{Result, StoreError};
use crate::traits::{DailyCount, UserStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Records indexed by id.
    users: BTreeMap<i64, UserRecord>,

    /// Last assigned id. Ids are never reused, as with AUTOINCREMENT.
    last_id: i64,
}

impl MemoryStoreInner {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                users: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, record: NewUserRecord) -> Result<UserRecord> {
        let mut inner = self.write()?;

        if inner.email_taken(&record.email, None) {
            return Err(StoreError::DuplicateEmail(record.email));
        }

        inner.last_id += 1;
        let user = record.with_id(inner.last_id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>> {
        let inner = self.read()?;
        let mut users: Vec<UserRecord> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let inner = self.read()?;
        Ok(inner.users.get(&id).cloned())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<UserRecord>> {
        let mut inner = self.write()?;

        let Some(existing) = inner.users.get(&id) else {
            return Ok(None);
        };
        if inner.email_taken(&changes.email, Some(id)) {
            return Err(StoreError::DuplicateEmail(changes.email));
        }

        let updated = changes.apply(existing);
        inner.users.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.write()?;
        Ok(inner.users.remove(&id).is_some())
    }

    async fn count_per_day(&self, since: NaiveDate) -> Result<Vec<DailyCount>> {
        let inner = self.read()?;

        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for user in inner.users.values() {
            let date = user.created_at.date_naive();
            if date >= since {
                *counts.entry(date).or_default() += 1;
            }
        }

        Ok(counts
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }
}
