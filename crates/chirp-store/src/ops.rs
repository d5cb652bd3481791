use chirp_types::models::{Chirp, User};
use chrono::Utc;

use crate::models::UserRecord;
use crate::{Store, StoreError};

impl Store {
    // -- Users --

    /// Register a new user. Emails are unique (case-sensitive, as stored);
    /// ids are assigned monotonically from the highest existing id.
    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        self.write(|doc| {
            if doc.users.values().any(|u| u.email == email) {
                return Err(StoreError::AlreadyExists);
            }
            let id = doc.users.keys().copied().max().unwrap_or(0) + 1;
            let record = UserRecord {
                id,
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
            };
            let user = User::from(&record);
            doc.users.insert(id, record);
            Ok(user)
        })
    }

    /// Linear scan by email. Returns the internal record, hash included;
    /// the session layer needs it to verify a login.
    pub fn get_user_by_email(&self, email: &str) -> Result<UserRecord, StoreError> {
        self.read(|doc| {
            doc.users
                .values()
                .find(|u| u.email == email)
                .cloned()
                .ok_or(StoreError::NotFound("user"))
        })
    }

    /// Replace a user's email and password hash in one update.
    pub fn update_user(
        &self,
        id: u64,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        self.write(|doc| {
            if doc.users.values().any(|u| u.email == email && u.id != id) {
                return Err(StoreError::AlreadyExists);
            }
            let record = doc
                .users
                .get_mut(&id)
                .ok_or(StoreError::NotFound("user"))?;
            record.email = email.to_owned();
            record.password_hash = password_hash.to_owned();
            Ok(User::from(&*record))
        })
    }

    // -- Chirps --

    /// Post a chirp. The next id is the current count + 1, which the on-disk
    /// format has always used; safe while deletion is unsupported.
    pub fn create_chirp(&self, body: &str) -> Result<Chirp, StoreError> {
        self.write(|doc| {
            let id = doc.chirps.len() as u64 + 1;
            let chirp = Chirp {
                id,
                body: body.to_owned(),
            };
            doc.chirps.insert(id, chirp.clone());
            Ok(chirp)
        })
    }

    /// All chirps, in map iteration order. Callers wanting a stable order
    /// must sort by id.
    pub fn chirps(&self) -> Result<Vec<Chirp>, StoreError> {
        self.read(|doc| Ok(doc.chirps.values().cloned().collect()))
    }

    pub fn get_chirp(&self, id: u64) -> Result<Chirp, StoreError> {
        self.read(|doc| {
            doc.chirps
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound("chirp"))
        })
    }

    // -- Refresh token revocation --

    /// Mark a refresh token revoked. Idempotent: revoking an already-revoked
    /// token keeps the original revocation timestamp and is not an error.
    pub fn revoke_token(&self, token: &str) -> Result<(), StoreError> {
        self.write(|doc| {
            doc.revoked_tokens
                .entry(token.to_owned())
                .or_insert_with(Utc::now);
            Ok(())
        })
    }

    pub fn is_token_revoked(&self, token: &str) -> Result<bool, StoreError> {
        self.read(|doc| Ok(doc.revoked_tokens.contains_key(token)))
    }
}
