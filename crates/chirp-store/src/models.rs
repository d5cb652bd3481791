//! Store-internal record types and the persisted document root.
//! Distinct from the chirp-types API models so the password hash never
//! crosses the API boundary by accident.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chirp_types::models::{Chirp, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        User {
            id: record.id,
            email: record.email.clone(),
        }
    }
}

/// The full persisted structure. Serialized to the backing file in one piece
/// on every mutation; integer map keys become strings in JSON.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: HashMap<u64, UserRecord>,
    #[serde(default)]
    pub chirps: HashMap<u64, Chirp>,
    /// Refresh token value -> when it was revoked. Presence of an entry is
    /// the sole revocation signal.
    #[serde(default)]
    pub revoked_tokens: HashMap<String, DateTime<Utc>>,
}
