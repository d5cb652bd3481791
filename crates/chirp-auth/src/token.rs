use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, get_current_timestamp,
};

use chirp_types::api::Claims;

use crate::AuthError;

/// Token class, encoded in the JWT issuer. Access tokens are short-lived and
/// validated store-free on every request; refresh tokens are long-lived and
/// additionally checked against the store's revocation list before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => "chirp-access",
            TokenKind::Refresh => "chirp-refresh",
        }
    }

    fn ttl_secs(self) -> u64 {
        match self {
            TokenKind::Access => 60 * 60,
            TokenKind::Refresh => 60 * 60 * 24 * 60,
        }
    }
}

/// Mint a signed HS256 token of the given class for `user_id`.
pub fn mint(secret: &str, user_id: u64, kind: TokenKind) -> Result<String, AuthError> {
    let now = get_current_timestamp();
    let claims = Claims {
        iss: kind.issuer().to_owned(),
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + kind.ttl_secs()) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Token)
}

/// Validate signature, expiry, and token class; returns the embedded user
/// id. Any failure collapses to `Unauthorized`.
pub fn verify(secret: &str, token: &str, kind: TokenKind) -> Result<u64, AuthError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[kind.issuer()]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::Unauthorized)?;

    data.claims.sub.parse().map_err(|_| AuthError::Unauthorized)
}
