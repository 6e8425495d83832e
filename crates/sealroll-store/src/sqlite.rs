//! SQLite implementation of the UserStore trait.
//!
//! This is the primary storage backend for the panel. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use sealroll_core::record::{format_timestamp, parse_timestamp};
use sealroll_core::{NewUserRecord, UserChanges, UserRecord};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{DailyCount, UserStore};

const SELECT_USER: &str =
    "SELECT id, email, role, status, created_at, email_hash, signature FROM users";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening user database");
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

/// Columns of a `users` row before role, status, and timestamp are parsed.
struct UserRow {
    id: i64,
    email: String,
    role: String,
    status: String,
    created_at: String,
    email_hash: String,
    signature: String,
}

impl UserRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            role: row.get("role")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            email_hash: row.get("email_hash")?,
            signature: row.get("signature")?,
        })
    }

    fn into_record(self) -> Result<UserRecord> {
        let invalid = |what: String| StoreError::InvalidData(format!("user {}: {}", self.id, what));

        let role = self.role.parse().map_err(|e| invalid(format!("{e}")))?;
        let status = self.status.parse().map_err(|e| invalid(format!("{e}")))?;
        let created_at = parse_timestamp(&self.created_at)
            .map_err(|e| invalid(format!("invalid created_at {:?}: {e}", self.created_at)))?;

        Ok(UserRecord {
            id: self.id,
            email: self.email,
            role,
            status,
            created_at,
            email_hash: self.email_hash,
            signature: self.signature,
        })
    }
}

fn query_user(conn: &Connection, id: i64) -> Result<Option<UserRecord>> {
    let row = conn
        .query_row(
            &format!("{SELECT_USER} WHERE id = ?1"),
            params![id],
            UserRow::from_row,
        )
        .optional()?;
    row.map(UserRow::into_record).transpose()
}

/// Map a UNIQUE violation on `users.email` to `DuplicateEmail`.
fn map_unique(err: rusqlite::Error, email: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create(&self, record: NewUserRecord) -> Result<UserRecord> {
        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO users (email, role, status, created_at, email_hash, signature)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.email,
                    record.role.as_str(),
                    record.status.as_str(),
                    format_timestamp(&record.created_at),
                    record.email_hash,
                    record.signature,
                ],
            )
            .map_err(|e| map_unique(e, &record.email))?;

            let id = conn.last_insert_rowid();
            Ok(record.with_id(id))
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>> {
        self.blocking(|conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_USER} ORDER BY created_at DESC, id DESC"))?;

            let rows = stmt
                .query_map([], UserRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.into_iter().map(UserRow::into_record).collect()
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        self.blocking(move |conn| query_user(conn, id)).await
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<UserRecord>> {
        self.blocking(move |conn| {
            let tx = conn.transaction()?;

            let updated = tx
                .execute(
                    "UPDATE users
                     SET email = ?1, role = ?2, status = ?3, email_hash = ?4, signature = ?5
                     WHERE id = ?6",
                    params![
                        changes.email,
                        changes.role.as_str(),
                        changes.status.as_str(),
                        changes.email_hash,
                        changes.signature,
                        id,
                    ],
                )
                .map_err(|e| map_unique(e, &changes.email))?;

            if updated == 0 {
                return Ok(None);
            }

            let user = query_user(&tx, id)?;
            tx.commit()?;
            Ok(user)
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.blocking(move |conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn count_per_day(&self, since: NaiveDate) -> Result<Vec<DailyCount>> {
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT DATE(created_at) AS day, COUNT(*) AS count
                 FROM users
                 WHERE DATE(created_at) >= ?1
                 GROUP BY day
                 ORDER BY day",
            )?;

            let rows = stmt
                .query_map(params![since.format("%Y-%m-%d").to_string()], |row| {
                    Ok((row.get::<_, String>("day")?, row.get::<_, i64>("count")?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.into_iter()
                .map(|(day, count)| {
                    let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                        .map_err(|e| StoreError::InvalidData(format!("invalid day {day:?}: {e}")))?;
                    Ok(DailyCount {
                        date,
                        count: count as u64,
                    })
                })
                .collect()
        })
        .await
    }
}
