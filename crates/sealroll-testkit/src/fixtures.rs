//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. RSA key generation is slow, so
//! the keypairs are derived once from fixed seeds and shared by every test in
//! the process.

use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use sealroll::{Panel, PanelConfig};
use sealroll_core::{
    ExportPayload, KeyPaths, KeyStore, Keypair, NewUserRecord, Role, Signer, Status, UserRecord,
};
use sealroll_store::MemoryStore;

const PRIMARY_SEED: u64 = 0x5ea1_0001;
const OTHER_SEED: u64 = 0x5ea1_0002;

fn seeded(cell: &'static OnceLock<Keypair>, seed: u64) -> &'static Keypair {
    cell.get_or_init(|| {
        Keypair::generate_with(&mut StdRng::seed_from_u64(seed))
            .expect("seeded key generation cannot fail")
    })
}

/// The keypair every fixture signs with.
pub fn shared_keypair() -> &'static Keypair {
    static KEYPAIR: OnceLock<Keypair> = OnceLock::new();
    seeded(&KEYPAIR, PRIMARY_SEED)
}

/// A second, unrelated keypair.
pub fn other_keypair() -> &'static Keypair {
    static KEYPAIR: OnceLock<Keypair> = OnceLock::new();
    seeded(&KEYPAIR, OTHER_SEED)
}

/// A fixed creation time: 2025-01-14T12:00:00.000Z.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 14, 12, 0, 0).unwrap()
}

/// A temporary key directory, optionally provisioned with the shared keypair.
pub struct KeyDir {
    pub dir: TempDir,
    pub paths: KeyPaths,
}

impl KeyDir {
    /// An empty directory; loading from it fails with `KeyNotFound`.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let paths = KeyPaths::in_dir(dir.path());
        Self { dir, paths }
    }

    /// A directory holding `private.pem` and `public.pem` of [`shared_keypair`].
    pub fn provisioned() -> Self {
        let key_dir = Self::empty();
        key_dir.provision();
        key_dir
    }

    /// Write the shared keypair into this directory.
    pub fn provision(&self) {
        shared_keypair()
            .write_to(&self.paths)
            .expect("write key files");
    }
}

/// A test fixture with the shared keypair and a memory-backed panel.
pub struct TestFixture {
    pub signer: Signer,
    pub panel: Panel<MemoryStore>,
}

impl TestFixture {
    /// Create a fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(PanelConfig::default())
    }

    /// Create a fixture with the given configuration. Key paths are ignored;
    /// keys are held in memory.
    pub fn with_config(config: PanelConfig) -> Self {
        let keypair = shared_keypair();
        let keys = KeyStore::from_keypair(keypair, config.keys.clone()).expect("prime key store");
        Self {
            signer: Signer::new(keypair),
            panel: Panel::new(keys, MemoryStore::new(), config),
        }
    }

    /// The PEM public key matching [`TestFixture::signer`].
    pub fn public_key_pem(&self) -> String {
        shared_keypair().public_key_pem().expect("encode public key")
    }

    /// A correctly signed record with the given id.
    pub fn make_user(&self, id: i64, email: &str) -> UserRecord {
        NewUserRecord::sign(&self.signer, email, Role::User, Status::Active, fixed_time())
            .with_id(id)
    }

    /// A payload of correctly signed records, ids counting down from the
    /// number of emails as an export lists them.
    pub fn make_payload(&self, emails: &[&str]) -> ExportPayload {
        let count = emails.len() as i64;
        let users = emails
            .iter()
            .enumerate()
            .map(|(i, email)| self.make_user(count - i as i64, email))
            .collect();
        ExportPayload::from_records(users, self.public_key_pem())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Flip one base64 character of a signature to another valid one.
pub fn corrupt_signature(signature: &str) -> String {
    let mut chars: Vec<char> = signature.chars().collect();
    let mid = chars.len() / 2;
    chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealroll_core::{hash_email, verify};

    #[test]
    fn test_shared_keypair_is_stable() {
        assert_eq!(
            shared_keypair().public_key_pem().unwrap(),
            shared_keypair().public_key_pem().unwrap()
        );
        assert_ne!(
            shared_keypair().public_key_pem().unwrap(),
            other_keypair().public_key_pem().unwrap()
        );
    }

    #[test]
    fn test_make_user_is_signed() {
        let fixture = TestFixture::new();
        let user = fixture.make_user(1, "a@x.com");
        assert_eq!(user.email_hash, hash_email("a@x.com"));
        assert!(verify(&user.email_hash, &user.signature, &fixture.public_key_pem()));
    }

    #[test]
    fn test_corrupt_signature_breaks_verification() {
        let fixture = TestFixture::new();
        let user = fixture.make_user(1, "a@x.com");
        let corrupted = corrupt_signature(&user.signature);
        assert_ne!(corrupted, user.signature);
        assert!(!verify(&user.email_hash, &corrupted, &fixture.public_key_pem()));
    }

    #[test]
    fn test_key_dir() {
        let key_dir = KeyDir::empty();
        assert!(!key_dir.paths.any_exists());
        key_dir.provision();
        assert!(KeyStore::open(key_dir.paths.clone()).is_ok());
    }

    #[tokio::test]
    async fn test_fixture_panel_starts_empty() {
        let fixture = TestFixture::new();
        assert!(fixture.panel.list_users().await.unwrap().is_empty());
    }
}
