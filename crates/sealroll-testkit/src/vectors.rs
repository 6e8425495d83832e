//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the digest and the wire encoding so that every client
//! decoder and hash implementation can be checked against the same bytes.

use chrono::{TimeZone, Utc};

use sealroll_core::{encode_payload, hash_email, ExportPayload, Role, Status, UserRecord};

/// A golden digest vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Email text.
    pub input: &'static str,
    /// Expected lowercase hex SHA-384.
    pub expected_digest: &'static str,
}

/// Get all golden digest vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "simple address",
            input: "a@x.com",
            expected_digest: "7ff19f62f24f83e31c50b7a0c9aded251798dece8b73fb8495bdaea562b7a072cd3d0d7256915e4d9c51eb2c64864bcd",
        },
        GoldenVector {
            name: "second address",
            input: "b@x.com",
            expected_digest: "baa6c94f99ff6cc566a849fadf77684471fc14c9dffe72a3df379a779091865376cedca8f4aa37ce845d7d7fff3a234a",
        },
        GoldenVector {
            name: "empty string",
            input: "",
            expected_digest: "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da274edebfe76f65fbd51ad2f14898b95b",
        },
        GoldenVector {
            name: "admin address",
            input: "admin@example.com",
            expected_digest: "ed04075d091ca0dcc9d921a9e2c40836cae182a39f5d13938c3beb90ec8ccd1240f23816e4e7181542a53cdea3e0bc98",
        },
        GoldenVector {
            name: "non-ascii address hashes its UTF-8 bytes",
            input: "Ünïcødé@example.com",
            expected_digest: "c53a880c161d0db1dfe8053e86da897dd86dffa0f65116a779346309714224496ccd7fe3ad26ff5cb597c8049af129f0",
        },
    ]
}

/// Check every digest vector.
///
/// Returns `(name, matches, computed_hex)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hex = hash_email(v.input);
            let matches = hex == v.expected_digest;
            (v.name.to_string(), matches, hex)
        })
        .collect()
}

/// The payload behind [`GOLDEN_EXPORT_HEX`].
pub fn golden_export_payload() -> ExportPayload {
    ExportPayload::from_records(
        vec![UserRecord {
            id: 1,
            email: "a@x.com".into(),
            role: Role::User,
            status: Status::Active,
            created_at: Utc.with_ymd_and_hms(2025, 1, 14, 12, 0, 0).unwrap(),
            email_hash: hash_email("a@x.com"),
            signature: "c2ln".into(),
        }],
        "PK",
    )
}

/// Expected encoding of [`golden_export_payload`].
pub const GOLDEN_EXPORT_HEX: &str = concat!(
    "0a9b01",
    "0801",
    "1207", "6140782e636f6d",
    "1a04", "75736572",
    "2206", "616374697665",
    "2a18", "323032352d30312d31345431323a30303a30302e3030305a",
    "3260", "37666631396636326632346638336533316335306237613063396164656432",
    "3531373938646563653862373366623834393562646165613536326237613037",
    "3263643364306437323536393135653464396335316562326336343836346263",
    "64",
    "3a04", "63326c6e",
    "1202", "504b",
);

/// Encode the golden payload as hex.
pub fn encode_golden_export() -> String {
    hex::encode(encode_payload(&golden_export_payload()).expect("golden payload is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealroll_core::decode_payload;

    #[test]
    fn test_all_digest_vectors_match() {
        for (name, matches, hex) in verify_all_vectors() {
            assert!(matches, "vector {name:?} produced {hex}");
        }
    }

    #[test]
    fn test_golden_export_encoding() {
        assert_eq!(encode_golden_export(), GOLDEN_EXPORT_HEX);
    }

    #[test]
    fn test_golden_export_decodes() {
        let bytes = hex::decode(GOLDEN_EXPORT_HEX).unwrap();
        assert_eq!(decode_payload(&bytes).unwrap(), golden_export_payload());
    }
}
