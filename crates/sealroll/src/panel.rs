//! The Panel: service facade over the key store and the user store.
//!
//! Every method maps onto one endpoint of the admin panel. Outputs are the
//! response bodies an HTTP layer would send, so a router only needs to pick a
//! status code.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sealroll_core::record::now_timestamp;
use sealroll_core::{
    encode_payload, ExportPayload, KeyStore, NewUserRecord, Role, Status, UserChanges,
    UserRecord, EXPORT_CONTENT_TYPE,
};
use sealroll_store::{DailyCount, SqliteStore, UserStore};

use crate::config::PanelConfig;
use crate::error::{PanelError, Result};

/// Create or update request body.
///
/// Fields arrive as text; an absent field deserializes to empty and is
/// rejected by [`UserInput::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub email: String,
    pub role: String,
    pub status: String,
}

impl UserInput {
    pub fn new(email: impl Into<String>, role: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
            status: status.into(),
        }
    }

    /// Check presence, then parse role and status.
    pub fn validate(&self) -> Result<(Role, Status)> {
        if self.email.is_empty() {
            return Err(PanelError::MissingInput("email"));
        }
        if self.role.is_empty() {
            return Err(PanelError::MissingInput("role"));
        }
        if self.status.is_empty() {
            return Err(PanelError::MissingInput("status"));
        }
        Ok((self.role.parse()?, self.status.parse()?))
    }
}

/// Binary export response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    /// Encoded `UserList`.
    pub body: Bytes,
    pub content_type: &'static str,
    /// Number of records in the body.
    pub count: usize,
}

/// `{ "publicKey": "<PEM>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: String,
}

/// `{ "status": "OK" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// The admin panel service.
///
/// Cheap to clone; clones share the key cache and the store.
pub struct Panel<S: UserStore> {
    keys: Arc<KeyStore>,
    store: Arc<S>,
    config: PanelConfig,
}

impl<S: UserStore> Clone for Panel<S> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl Panel<SqliteStore> {
    /// Open the configured SQLite database and load both keys.
    ///
    /// Fails with `KeyNotFound` if the keypair has not been provisioned. Use
    /// [`Panel::new`] with [`KeyStore::new`] to defer key loading instead.
    pub fn open(config: PanelConfig) -> Result<Self> {
        let keys = KeyStore::open(config.keys.clone())?;
        let store = SqliteStore::open(&config.database_path)?;
        info!(database = %config.database_path.display(), "panel opened");
        Ok(Self::new(keys, store, config))
    }
}

impl<S: UserStore> Panel<S> {
    /// Create a new panel instance.
    pub fn new(keys: KeyStore, store: S, config: PanelConfig) -> Self {
        Self {
            keys: Arc::new(keys),
            store: Arc::new(store),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the key store reference.
    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a user, hashing and signing the email before the first write.
    pub async fn create_user(&self, input: UserInput) -> Result<UserRecord> {
        let (role, status) = input.validate()?;
        let signer = self.keys.signer()?;

        let record = NewUserRecord::sign(signer, input.email, role, status, now_timestamp());
        let user = self.store.create(record).await?;

        info!(id = user.id, "user created");
        Ok(user)
    }

    /// Replace a user's email, role, and status, re-signing the email.
    ///
    /// Returns `None` if no user has this id.
    pub async fn update_user(&self, id: i64, input: UserInput) -> Result<Option<UserRecord>> {
        let (role, status) = input.validate()?;
        let signer = self.keys.signer()?;

        let changes = UserChanges::sign(signer, input.email, role, status);
        let user = self.store.update(id, changes).await?;

        match &user {
            Some(_) => info!(id, "user updated"),
            None => debug!(id, "update of missing user"),
        }
        Ok(user)
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// All users, newest first.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.store.find_all().await?)
    }

    /// Delete a user. Returns whether a user was removed.
    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(id, "user deleted");
        }
        Ok(deleted)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statistics
    // ─────────────────────────────────────────────────────────────────────────

    /// Users created per day over the configured window ending at `today`.
    ///
    /// One entry per day, oldest first, days without creations counted as 0.
    pub async fn users_per_day(&self, today: NaiveDate) -> Result<Vec<DailyCount>> {
        let days = self.config.stats_days;
        if days == 0 {
            return Ok(Vec::new());
        }

        let since = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| PanelError::Config(format!("stats window of {days} days is out of range")))?;

        let counts: HashMap<NaiveDate, u64> = self
            .store
            .count_per_day(since)
            .await?
            .into_iter()
            .map(|c| (c.date, c.count))
            .collect();

        Ok(since
            .iter_days()
            .take(days as usize)
            .map(|date| DailyCount {
                date,
                count: counts.get(&date).copied().unwrap_or(0),
            })
            .collect())
    }

    /// [`Panel::users_per_day`] ending at the current UTC date.
    pub async fn users_per_day_now(&self) -> Result<Vec<DailyCount>> {
        self.users_per_day(Utc::now().date_naive()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Encode every user together with the public key.
    ///
    /// All-or-nothing: a missing key or an invalid record fails the whole
    /// export.
    pub async fn export(&self) -> Result<ExportResponse> {
        let public_key = self.keys.public_key_pem()?.to_string();
        let users = self.store.find_all().await?;
        let count = users.len();

        let body = encode_payload(&ExportPayload::from_records(users, public_key))?;
        info!(count, bytes = body.len(), "export encoded");

        Ok(ExportResponse {
            body: Bytes::from(body),
            content_type: EXPORT_CONTENT_TYPE,
            count,
        })
    }

    /// The PEM public key clients verify against.
    pub fn public_key(&self) -> Result<PublicKeyResponse> {
        Ok(PublicKeyResponse {
            public_key: self.keys.public_key_pem()?.to_string(),
        })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "OK".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealroll_core::{hash_email, KeyPaths, Keypair};
    use sealroll_store::MemoryStore;
    use std::sync::OnceLock;

    fn keypair() -> &'static Keypair {
        static KEYPAIR: OnceLock<Keypair> = OnceLock::new();
        KEYPAIR.get_or_init(|| {
            use rand::SeedableRng;
            Keypair::generate_with(&mut rand::rngs::StdRng::seed_from_u64(41)).unwrap()
        })
    }

    fn make_panel(config: PanelConfig) -> Panel<MemoryStore> {
        let keys = KeyStore::from_keypair(keypair(), KeyPaths::default()).unwrap();
        Panel::new(keys, MemoryStore::new(), config)
    }

    #[test]
    fn test_input_validation() {
        assert!(matches!(
            UserInput::new("", "user", "active").validate(),
            Err(PanelError::MissingInput("email"))
        ));
        assert!(matches!(
            UserInput::new("a@x.com", "", "active").validate(),
            Err(PanelError::MissingInput("role"))
        ));
        assert!(matches!(
            UserInput::new("a@x.com", "user", "").validate(),
            Err(PanelError::MissingInput("status"))
        ));
        assert!(matches!(
            UserInput::new("a@x.com", "superuser", "active").validate(),
            Err(PanelError::InvalidInput(_))
        ));
        assert_eq!(
            UserInput::new("a@x.com", "moderator", "inactive").validate().unwrap(),
            (Role::Moderator, Status::Inactive)
        );
    }

    #[test]
    fn test_input_missing_json_field_is_empty() {
        let input: UserInput = serde_json::from_str(r#"{"email":"a@x.com","role":"user"}"#).unwrap();
        assert!(matches!(input.validate(), Err(PanelError::MissingInput("status"))));
    }

    #[tokio::test]
    async fn test_create_signs_email() {
        let panel = make_panel(PanelConfig::default());
        let user = panel
            .create_user(UserInput::new("a@x.com", "user", "active"))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.email_hash, hash_email("a@x.com"));
        assert!(sealroll_core::verify(
            &user.email_hash,
            &user.signature,
            &keypair().public_key_pem().unwrap()
        ));
    }

    #[tokio::test]
    async fn test_update_resigns_and_keeps_created_at() {
        let panel = make_panel(PanelConfig::default());
        let user = panel
            .create_user(UserInput::new("a@x.com", "user", "active"))
            .await
            .unwrap();

        let updated = panel
            .update_user(user.id, UserInput::new("b@x.com", "admin", "inactive"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.created_at, user.created_at);
        assert_eq!(updated.email_hash, hash_email("b@x.com"));
        assert_ne!(updated.signature, user.signature);
        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_missing_keys_block_signing_not_reads() {
        let dir = tempfile::tempdir().unwrap();
        let keys = KeyStore::new(KeyPaths::in_dir(dir.path()));
        let panel = Panel::new(keys, MemoryStore::new(), PanelConfig::default());

        let err = panel
            .create_user(UserInput::new("a@x.com", "user", "active"))
            .await
            .unwrap_err();
        assert!(err.is_key_not_found());
        assert!(err.to_string().contains("sealroll-keygen"));

        assert!(panel.list_users().await.unwrap().is_empty());
        assert!(panel.export().await.unwrap_err().is_key_not_found());
        assert!(panel.public_key().unwrap_err().is_key_not_found());
        assert_eq!(panel.health().status, "OK");
    }

    #[tokio::test]
    async fn test_users_per_day_fills_gaps() {
        let panel = make_panel(PanelConfig::default());
        panel
            .create_user(UserInput::new("a@x.com", "user", "active"))
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        let days = panel.users_per_day(today).await.unwrap();

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, today - Days::new(6));
        assert_eq!(days[6].date, today);
        assert_eq!(days.iter().map(|d| d.count).sum::<u64>(), 1);
    }

    #[tokio::test]
    async fn test_users_per_day_zero_window() {
        let config = PanelConfig {
            stats_days: 0,
            ..PanelConfig::default()
        };
        let panel = make_panel(config);
        assert!(panel.users_per_day_now().await.unwrap().is_empty());
    }

    #[test]
    fn test_response_json_shapes() {
        let panel = make_panel(PanelConfig::default());
        let json = serde_json::to_value(panel.public_key().unwrap()).unwrap();
        assert!(json["publicKey"]
            .as_str()
            .unwrap()
            .starts_with("-----BEGIN PUBLIC KEY-----"));

        let json = serde_json::to_value(panel.health()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "OK" }));
    }
}
