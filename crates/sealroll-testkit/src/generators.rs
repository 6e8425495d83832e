//! Proptest generators for property-based testing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use sealroll_core::record::format_timestamp;
use sealroll_core::{ExportPayload, ExportedUser, NewUserRecord, Role, Signer, Status, UserRecord};

/// Generate a plausible email address.
pub fn email() -> impl Strategy<Value = String> {
    ("[a-z0-9][a-z0-9._+-]{0,15}", "[a-z]{1,10}", prop_oneof!["com", "org", "net", "io"])
        .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
}

/// Generate any non-empty string, including non-ASCII text.
pub fn text() -> impl Strategy<Value = String> {
    "\\PC{1,40}".prop_map(String::from)
}

/// Generate a Role.
pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Admin), Just(Role::Moderator)]
}

/// Generate a Status.
pub fn status() -> impl Strategy<Value = Status> {
    prop_oneof![Just(Status::Active), Just(Status::Inactive)]
}

/// Generate a millisecond-precision timestamp between 2000 and 2100.
pub fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800_000i64..4_102_444_800_000i64).prop_map(|ms| {
        Utc.timestamp_millis_opt(ms)
            .single()
            .expect("in-range millisecond timestamp")
    })
}

/// Generate wire text for a typed field: usually a known value, sometimes
/// anything a foreign sender might write.
fn wire_text(known: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    prop_oneof![3 => known, 1 => text()]
}

/// Generate an exported record with arbitrary (unsigned) digest and signature
/// text.
///
/// Suitable for codec tests, where the signature is opaque.
pub fn unsigned_record() -> impl Strategy<Value = ExportedUser> {
    (
        any::<i64>(),
        text(),
        wire_text(role().prop_map(|r| r.as_str().to_string())),
        wire_text(status().prop_map(|s| s.as_str().to_string())),
        wire_text(timestamp().prop_map(|ts| format_timestamp(&ts))),
        "[0-9a-f]{96}",
        "[A-Za-z0-9+/]{4,64}={0,2}",
    )
        .prop_map(
            |(id, email, role, status, created_at, email_hash, signature)| ExportedUser {
                id,
                email,
                role,
                status,
                created_at,
                email_hash,
                signature,
            },
        )
}

/// Generate an export payload of up to `max_users` unsigned records.
pub fn payload(max_users: usize) -> impl Strategy<Value = ExportPayload> {
    (
        prop::collection::vec(unsigned_record(), 0..=max_users),
        text(),
    )
        .prop_map(|(users, public_key)| ExportPayload { users, public_key })
}

/// Parameters for generating a signed user.
#[derive(Debug, Clone)]
pub struct UserParams {
    pub email: String,
    pub role: Role,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Arbitrary for UserParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (email(), role(), status(), timestamp())
            .prop_map(|(email, role, status, created_at)| UserParams {
                email,
                role,
                status,
                created_at,
            })
            .boxed()
    }
}

/// Sign a record from parameters.
pub fn record_from_params(signer: &Signer, params: &UserParams, id: i64) -> UserRecord {
    NewUserRecord::sign(
        signer,
        params.email.clone(),
        params.role,
        params.status,
        params.created_at,
    )
    .with_id(id)
}
