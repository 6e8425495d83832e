//! Export codec: Protocol Buffers encoding of the user list.
//!
//! The wire schema is `proto/user.proto` at the repository root, shared
//! verbatim with every client decoder. The message structs in [`schema`]
//! mirror it tag for tag. Encoding walks fields in ascending tag order, so the
//! same payload always produces identical bytes.
//!
//! proto3 omits empty strings on the wire, which makes "missing" and "empty"
//! indistinguishable to a decoder. Required fields are therefore checked for
//! emptiness before encoding.

use prost::Message;

use crate::error::{CoreError, Result, ValidationError};
use crate::record::{ExportPayload, ExportedUser};

/// MIME type of an encoded [`schema::UserList`].
pub const EXPORT_CONTENT_TYPE: &str = "application/octet-stream";

/// Message definitions matching `proto/user.proto`.
pub mod schema {
    /// `message UserRecord`.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UserRecord {
        #[prost(int64, tag = "1")]
        pub id: i64,
        #[prost(string, tag = "2")]
        pub email: String,
        #[prost(string, tag = "3")]
        pub role: String,
        #[prost(string, tag = "4")]
        pub status: String,
        #[prost(string, tag = "5")]
        pub created_at: String,
        #[prost(string, tag = "6")]
        pub email_hash: String,
        #[prost(string, tag = "7")]
        pub signature: String,
    }

    /// `message UserList`.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UserList {
        #[prost(message, repeated, tag = "1")]
        pub users: Vec<UserRecord>,
        #[prost(string, tag = "2")]
        pub public_key: String,
    }
}

/// Encode an export payload.
///
/// Fails with [`ValidationError`] if any record lacks a required field or the
/// public key is empty. Nothing is encoded on failure.
pub fn encode_payload(payload: &ExportPayload) -> Result<Vec<u8>> {
    let message = payload_to_message(payload);
    validate_message(&message)?;
    Ok(message.encode_to_vec())
}

/// Decode an export payload.
///
/// Fails only on malformed protobuf. Field values are returned as received.
pub fn decode_payload(bytes: &[u8]) -> Result<ExportPayload> {
    let message =
        schema::UserList::decode(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    Ok(message_to_payload(message))
}

/// Check the required fields of an encoded-form user list.
pub fn validate_message(message: &schema::UserList) -> std::result::Result<(), ValidationError> {
    for (index, user) in message.users.iter().enumerate() {
        let required = [
            ("email", &user.email),
            ("role", &user.role),
            ("status", &user.status),
            ("createdAt", &user.created_at),
            ("emailHash", &user.email_hash),
            ("signature", &user.signature),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ValidationError::MissingField { index, field });
        }
    }

    if message.public_key.is_empty() {
        return Err(ValidationError::MissingPublicKey);
    }

    Ok(())
}

fn record_to_message(record: &ExportedUser) -> schema::UserRecord {
    schema::UserRecord {
        id: record.id,
        email: record.email.clone(),
        role: record.role.clone(),
        status: record.status.clone(),
        created_at: record.created_at.clone(),
        email_hash: record.email_hash.clone(),
        signature: record.signature.clone(),
    }
}

fn payload_to_message(payload: &ExportPayload) -> schema::UserList {
    schema::UserList {
        users: payload.users.iter().map(record_to_message).collect(),
        public_key: payload.public_key.clone(),
    }
}

fn message_to_record(message: schema::UserRecord) -> ExportedUser {
    ExportedUser {
        id: message.id,
        email: message.email,
        role: message.role,
        status: message.status,
        created_at: message.created_at,
        email_hash: message.email_hash,
        signature: message.signature,
    }
}

fn message_to_payload(message: schema::UserList) -> ExportPayload {
    ExportPayload {
        users: message.users.into_iter().map(message_to_record).collect(),
        public_key: message.public_key,
    }
}
