use std::sync::Arc;

use chirp_store::{Store, StoreError};
use chirp_types::api::LoginResponse;
use chirp_types::models::User;

use crate::token::{self, TokenKind};
use crate::{AuthError, password};

/// Session facade over the record store: registration, login, and the
/// refresh-token lifecycle. Constructed once at service start and shared by
/// reference with every request handler.
pub struct Sessions {
    store: Arc<Store>,
    jwt_secret: String,
}

impl Sessions {
    pub fn new(store: Arc<Store>, jwt_secret: impl Into<String>) -> Self {
        Self {
            store,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Hash the password and create the user. A duplicate email surfaces as
    /// the store's `AlreadyExists` for the facade to map.
    pub fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let hash = password::hash_password(password)?;
        Ok(self.store.create_user(email, &hash)?)
    }

    /// Verify credentials and mint one token of each class. A missing user
    /// and a wrong password are indistinguishable to the caller.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let record = match self.store.get_user_by_email(email) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => return Err(AuthError::Unauthorized),
            Err(err) => return Err(err.into()),
        };
        if !password::verify_password(&record.password_hash, password) {
            return Err(AuthError::Unauthorized);
        }

        let token = token::mint(&self.jwt_secret, record.id, TokenKind::Access)?;
        let refresh_token = token::mint(&self.jwt_secret, record.id, TokenKind::Refresh)?;
        Ok(LoginResponse {
            id: record.id,
            email: record.email,
            token,
            refresh_token,
        })
    }

    /// Exchange a live refresh token for a new access token. The refresh
    /// token itself is never rotated.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user_id = token::verify(&self.jwt_secret, refresh_token, TokenKind::Refresh)?;
        if self.store.is_token_revoked(refresh_token)? {
            return Err(AuthError::Unauthorized);
        }
        token::mint(&self.jwt_secret, user_id, TokenKind::Access)
    }

    /// Permanently retire a refresh token. Revoking twice is fine.
    pub fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        token::verify(&self.jwt_secret, refresh_token, TokenKind::Refresh)?;
        Ok(self.store.revoke_token(refresh_token)?)
    }

    /// Validate an access token and return the embedded user id. Needs no
    /// store lookup, so the facade can gate every request with it cheaply.
    pub fn authorize(&self, access_token: &str) -> Result<u64, AuthError> {
        token::verify(&self.jwt_secret, access_token, TokenKind::Access)
    }

    /// Replace the authorized user's email and password in one update.
    pub fn update_user(
        &self,
        access_token: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let user_id = self.authorize(access_token)?;
        let hash = password::hash_password(password)?;
        Ok(self.store.update_user(user_id, email, &hash)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn open_sessions() -> (tempfile::TempDir, Arc<Store>, Sessions) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("chirps.json")).unwrap());
        let sessions = Sessions::new(Arc::clone(&store), SECRET);
        (dir, store, sessions)
    }

    #[test]
    fn login_roundtrip() {
        let (_dir, _store, sessions) = open_sessions();
        sessions.register("a@b.com", "pw").unwrap();

        let resp = sessions.login("a@b.com", "pw").unwrap();
        assert_eq!(resp.email, "a@b.com");
        assert!(!resp.token.is_empty());
        assert!(!resp.refresh_token.is_empty());
        assert_eq!(sessions.authorize(&resp.token).unwrap(), resp.id);
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let (_dir, _store, sessions) = open_sessions();
        sessions.register("a@b.com", "pw").unwrap();

        assert!(matches!(
            sessions.login("a@b.com", "wrong"),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            sessions.login("nobody@b.com", "pw"),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn duplicate_registration_is_a_store_conflict() {
        let (_dir, _store, sessions) = open_sessions();
        sessions.register("a@b.com", "pw").unwrap();

        assert!(matches!(
            sessions.register("a@b.com", "other"),
            Err(AuthError::Store(StoreError::AlreadyExists))
        ));
    }

    #[test]
    fn refresh_mints_a_valid_access_token() {
        let (_dir, _store, sessions) = open_sessions();
        let user = sessions.register("a@b.com", "pw").unwrap();
        let resp = sessions.login("a@b.com", "pw").unwrap();

        let access = sessions.refresh(&resp.refresh_token).unwrap();
        assert_eq!(sessions.authorize(&access).unwrap(), user.id);
    }

    #[test]
    fn revoked_refresh_token_is_refused() {
        let (_dir, store, sessions) = open_sessions();
        sessions.register("a@b.com", "pw").unwrap();
        let resp = sessions.login("a@b.com", "pw").unwrap();

        sessions.revoke(&resp.refresh_token).unwrap();
        assert!(store.is_token_revoked(&resp.refresh_token).unwrap());
        assert!(matches!(
            sessions.refresh(&resp.refresh_token),
            Err(AuthError::Unauthorized)
        ));

        // Revoking again is idempotent.
        sessions.revoke(&resp.refresh_token).unwrap();
    }

    #[test]
    fn garbage_refresh_token_is_refused() {
        let (_dir, _store, sessions) = open_sessions();
        assert!(matches!(
            sessions.refresh("never-issued"),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            sessions.revoke("never-issued"),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn token_classes_do_not_cross_over() {
        let (_dir, _store, sessions) = open_sessions();
        sessions.register("a@b.com", "pw").unwrap();
        let resp = sessions.login("a@b.com", "pw").unwrap();

        // An access token cannot drive the refresh path, and a refresh
        // token cannot authorize a request.
        assert!(sessions.refresh(&resp.token).is_err());
        assert!(sessions.revoke(&resp.token).is_err());
        assert!(sessions.authorize(&resp.refresh_token).is_err());
    }

    #[test]
    fn update_user_rotates_credentials() {
        let (_dir, _store, sessions) = open_sessions();
        sessions.register("a@b.com", "pw").unwrap();
        let resp = sessions.login("a@b.com", "pw").unwrap();

        let updated = sessions
            .update_user(&resp.token, "new@b.com", "new-pw")
            .unwrap();
        assert_eq!(updated.email, "new@b.com");

        assert!(sessions.login("a@b.com", "pw").is_err());
        sessions.login("new@b.com", "new-pw").unwrap();
    }
}
