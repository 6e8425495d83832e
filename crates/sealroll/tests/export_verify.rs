//! End-to-end export and client verification.
//!
//! Records are created through the panel, exported as protobuf bytes, and
//! checked the way a client checks them: digest recomputed from the email,
//! signature verified against the shipped public key.

use sealroll::core::{
    decode_payload, encode_payload, hash_email, verify, ExportedUser, EXPORT_CONTENT_TYPE,
};
use sealroll::store::StoreError;
use sealroll::{
    verify_export, verify_export_parallel, KeyStore, Panel, PanelConfig, PanelError, Role,
    SqliteStore, Status, UserInput,
};
use sealroll_testkit::{corrupt_signature, KeyDir, TestFixture};

fn input(email: &str) -> UserInput {
    UserInput::new(email, "user", "active")
}

#[tokio::test]
async fn create_then_export_verifies() {
    let fixture = TestFixture::new();
    let user = fixture.panel.create_user(input("a@x.com")).await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.role, Role::User);
    assert_eq!(user.status, Status::Active);
    assert_eq!(user.email_hash, hash_email("a@x.com"));
    assert!(verify(&user.email_hash, &user.signature, &fixture.public_key_pem()));

    let export = fixture.panel.export().await.unwrap();
    assert_eq!(export.content_type, EXPORT_CONTENT_TYPE);
    assert_eq!(export.count, 1);

    let payload = decode_payload(&export.body).unwrap();
    assert_eq!(payload.users, vec![ExportedUser::from(&user)]);
    assert_eq!(payload.public_key, fixture.public_key_pem());

    let view = verify_export(&export.body).unwrap();
    assert_eq!(view.total, 1);
    assert_eq!(view.trusted(), 1);
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let fixture = TestFixture::new();
    fixture.panel.create_user(input("a@x.com")).await.unwrap();

    let err = fixture.panel.create_user(input("a@x.com")).await.unwrap_err();
    assert!(matches!(err, PanelError::Store(StoreError::DuplicateEmail(_))));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn empty_export() {
    let fixture = TestFixture::new();
    let export = fixture.panel.export().await.unwrap();

    let payload = decode_payload(&export.body).unwrap();
    assert!(payload.users.is_empty());
    assert_eq!(payload.public_key, fixture.public_key_pem());

    let view = verify_export(&export.body).unwrap();
    assert_eq!((view.total, view.trusted()), (0, 0));
}

#[tokio::test]
async fn flipped_signature_excluded_total_unchanged() {
    let fixture = TestFixture::new();
    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        fixture.panel.create_user(input(email)).await.unwrap();
    }

    let export = fixture.panel.export().await.unwrap();
    let mut payload = decode_payload(&export.body).unwrap();
    payload.users[1].signature = corrupt_signature(&payload.users[1].signature);
    let tampered_id = payload.users[1].id;

    let view = verify_export(&encode_payload(&payload).unwrap()).unwrap();
    assert_eq!(view.total, 3);
    assert_eq!(view.trusted(), 2);
    assert!(view.users.iter().all(|u| u.id != tampered_id));
}

#[tokio::test]
async fn email_swap_with_consistent_hash_and_signature_rejected() {
    let fixture = TestFixture::new();
    fixture.panel.create_user(input("a@x.com")).await.unwrap();

    let export = fixture.panel.export().await.unwrap();
    let mut payload = decode_payload(&export.body).unwrap();

    // emailHash/signature still form a valid pair for "a@x.com".
    payload.users[0].email = "b@x.com".into();
    assert!(verify(
        &payload.users[0].email_hash,
        &payload.users[0].signature,
        &payload.public_key
    ));

    let view = verify_export(&encode_payload(&payload).unwrap()).unwrap();
    assert_eq!(view.total, 1);
    assert_eq!(view.trusted(), 0);
}

#[tokio::test]
async fn foreign_role_in_one_record_keeps_the_rest_trusted() {
    let fixture = TestFixture::new();
    for email in ["a@x.com", "b@x.com"] {
        fixture.panel.create_user(input(email)).await.unwrap();
    }

    let export = fixture.panel.export().await.unwrap();
    let mut payload = decode_payload(&export.body).unwrap();
    payload.users[1].role = "Admin".into();
    let bytes = encode_payload(&payload).unwrap();

    let view = verify_export(&bytes).unwrap();
    assert_eq!(view.total, 2);
    assert_eq!(view.trusted(), 2);
    assert_eq!(view.users[1].role, "Admin");

    // Received text survives a decode and re-encode unchanged.
    assert_eq!(encode_payload(&decode_payload(&bytes).unwrap()).unwrap(), bytes);
}

#[tokio::test]
async fn update_keeps_record_verifiable() {
    let fixture = TestFixture::new();
    let user = fixture.panel.create_user(input("a@x.com")).await.unwrap();

    fixture
        .panel
        .update_user(user.id, UserInput::new("renamed@x.com", "admin", "inactive"))
        .await
        .unwrap()
        .unwrap();

    let export = fixture.panel.export().await.unwrap();
    let view = verify_export(&export.body).unwrap();
    assert_eq!(view.trusted(), 1);
    assert_eq!(view.users[0].email, "renamed@x.com");
    assert_eq!(view.users[0].created_at, user.created_at_string());
}

#[tokio::test]
async fn export_from_sqlite_panel_with_key_files() {
    let key_dir = KeyDir::provisioned();
    let config = PanelConfig {
        keys: key_dir.paths.clone(),
        database_path: key_dir.dir.path().join("sealroll.db"),
        ..PanelConfig::default()
    };
    let panel = Panel::open(config).unwrap();

    for email in ["a@x.com", "b@x.com"] {
        panel.create_user(input(email)).await.unwrap();
    }
    assert!(panel.delete_user(1).await.unwrap());

    let export = panel.export().await.unwrap();
    let view = verify_export_parallel(export.body.clone()).await.unwrap();
    assert_eq!(view.total, 1);
    assert_eq!(view.trusted(), 1);
    assert_eq!(view.users[0].email, "b@x.com");
    assert_eq!(view, verify_export(&export.body).unwrap());
}

#[tokio::test]
async fn open_fails_without_keys() {
    let key_dir = KeyDir::empty();
    let config = PanelConfig {
        keys: key_dir.paths.clone(),
        database_path: key_dir.dir.path().join("sealroll.db"),
        ..PanelConfig::default()
    };

    let err = Panel::open(config).err().unwrap();
    assert!(err.is_key_not_found());
    assert!(err.to_string().contains("sealroll-keygen"));
}

#[tokio::test]
async fn lazy_keys_surface_keygen_hint_until_provisioned() {
    let key_dir = KeyDir::empty();
    let store = SqliteStore::open(key_dir.dir.path().join("sealroll.db")).unwrap();
    let panel = Panel::new(
        KeyStore::new(key_dir.paths.clone()),
        store,
        PanelConfig::default(),
    );

    let err = panel.create_user(input("a@x.com")).await.unwrap_err();
    assert!(err.is_key_not_found());
    assert!(err.to_string().contains("sealroll-keygen"));

    // Provisioning afterwards works without reopening.
    key_dir.provision();
    let user = panel.create_user(input("a@x.com")).await.unwrap();
    assert_eq!(user.id, 1);
}

#[tokio::test]
async fn export_order_is_newest_first() {
    let fixture = TestFixture::new();
    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        fixture.panel.create_user(input(email)).await.unwrap();
    }

    let export = fixture.panel.export().await.unwrap();
    let ids: Vec<i64> = decode_payload(&export.body)
        .unwrap()
        .users
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}
