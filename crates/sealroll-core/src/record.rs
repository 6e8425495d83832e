//! User records: the signed unit of the admin panel.
//!
//! A record binds an email to a digest and a signature over that digest.
//! `email_hash` and `signature` are written together, whenever the email is
//! written; nothing else in the record is covered by the signature.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::hash_email;
use crate::signer::Signer;

/// A role or status string that is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Moderator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Moderator];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            _ => Err(UnknownVariant {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an account is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Active, Status::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            _ => Err(UnknownVariant {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current time, truncated to milliseconds so it survives a text round trip.
pub fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Render a timestamp as `2025-01-14T12:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|ts| ts.with_timezone(&Utc))
}

mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(d)?;
        super::parse_timestamp(&s).map_err(serde::de::Error::custom)
    }
}

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Store-assigned, increasing in creation order.
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub status: Status,
    /// Set once at creation.
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    /// Hex SHA-384 of `email` as computed by the writer. Untrusted on read.
    pub email_hash: String,
    /// Base64 signature over `email_hash`.
    pub signature: String,
}

impl UserRecord {
    /// `created_at` in its wire form.
    pub fn created_at_string(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

/// The email binding: digest plus signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEmail {
    pub email_hash: String,
    pub signature: String,
}

impl SignedEmail {
    /// Hash the email and sign the hex digest.
    pub fn sign(signer: &Signer, email: &str) -> Self {
        let email_hash = hash_email(email);
        let signature = signer.sign(&email_hash);
        Self {
            email_hash,
            signature,
        }
    }
}

/// A record ready for its first write; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub email: String,
    pub role: Role,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub email_hash: String,
    pub signature: String,
}

impl NewUserRecord {
    /// Hash and sign before the first persist.
    pub fn sign(
        signer: &Signer,
        email: impl Into<String>,
        role: Role,
        status: Status,
        created_at: DateTime<Utc>,
    ) -> Self {
        let email = email.into();
        let SignedEmail {
            email_hash,
            signature,
        } = SignedEmail::sign(signer, &email);
        Self {
            email,
            role,
            status,
            created_at,
            email_hash,
            signature,
        }
    }

    /// Attach the store-assigned id.
    pub fn with_id(self, id: i64) -> UserRecord {
        UserRecord {
            id,
            email: self.email,
            role: self.role,
            status: self.status,
            created_at: self.created_at,
            email_hash: self.email_hash,
            signature: self.signature,
        }
    }
}

/// Replacement fields for an update. `created_at` is never among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub email: String,
    pub role: Role,
    pub status: Status,
    pub email_hash: String,
    pub signature: String,
}

impl UserChanges {
    /// Re-hash and re-sign the (possibly new) email.
    pub fn sign(signer: &Signer, email: impl Into<String>, role: Role, status: Status) -> Self {
        let email = email.into();
        let SignedEmail {
            email_hash,
            signature,
        } = SignedEmail::sign(signer, &email);
        Self {
            email,
            role,
            status,
            email_hash,
            signature,
        }
    }

    /// Apply to an existing record, keeping its id and creation time.
    pub fn apply(self, existing: &UserRecord) -> UserRecord {
        UserRecord {
            id: existing.id,
            email: self.email,
            role: self.role,
            status: self.status,
            created_at: existing.created_at,
            email_hash: self.email_hash,
            signature: self.signature,
        }
    }
}

/// A user record as it travels in an export.
///
/// Everything except the id stays text. Role, status and `createdAt` are
/// carried exactly as the sender wrote them and are not covered by the
/// signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedUser {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub status: String,
    pub created_at: String,
    pub email_hash: String,
    pub signature: String,
}

impl From<&UserRecord> for ExportedUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            role: record.role.as_str().to_string(),
            status: record.status.as_str().to_string(),
            created_at: record.created_at_string(),
            email_hash: record.email_hash.clone(),
            signature: record.signature.clone(),
        }
    }
}

impl From<UserRecord> for ExportedUser {
    fn from(record: UserRecord) -> Self {
        Self {
            created_at: record.created_at_string(),
            role: record.role.as_str().to_string(),
            status: record.status.as_str().to_string(),
            id: record.id,
            email: record.email,
            email_hash: record.email_hash,
            signature: record.signature,
        }
    }
}

/// The transient bulk export: all records plus the key that verifies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub users: Vec<ExportedUser>,
    pub public_key: String,
}

impl ExportPayload {
    /// Build an export from stored records, preserving their order.
    pub fn from_records(users: Vec<UserRecord>, public_key: impl Into<String>) -> Self {
        Self {
            users: users.into_iter().map(ExportedUser::from).collect(),
            public_key: public_key.into(),
        }
    }
}
