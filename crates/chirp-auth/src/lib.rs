pub mod password;
pub mod session;
pub mod token;

use thiserror::Error;

use chirp_store::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential or token rejection. Deliberately carries no detail so a
    /// failed login never reveals whether the account exists.
    #[error("unauthorized")]
    Unauthorized,
    #[error("password hash: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("token encoding: {0}")]
    Token(jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
