use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims shared between chirp-auth (minting and validation) and any
/// transport layer that needs to inspect a decoded token. Canonical
/// definition lives here in chirp-types to eliminate duplication.
///
/// `sub` is the decimal user id; `iss` carries the token class
/// (access vs refresh) so one class can never stand in for the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

/// Decoded body of a register, login, or credential-update request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: u64,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

// -- Chirps --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChirpRequest {
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_decode_from_expected_shapes() {
        let creds: CredentialsRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"pw"}"#).unwrap();
        assert_eq!(creds.email, "a@b.com");
        assert_eq!(creds.password, "pw");

        let chirp: ChirpRequest = serde_json::from_str(r#"{"body":"hello"}"#).unwrap();
        assert_eq!(chirp.body, "hello");
    }

    #[test]
    fn unknown_fields_are_rejected_at_the_boundary() {
        assert!(
            serde_json::from_str::<CredentialsRequest>(
                r#"{"email":"a@b.com","password":"pw","admin":true}"#
            )
            .is_err()
        );
        assert!(serde_json::from_str::<ChirpRequest>(r#"{"body":"hi","id":9}"#).is_err());
    }

    #[test]
    fn claims_roundtrip() {
        let claims = Claims {
            iss: "chirp-access".into(),
            sub: "42".into(),
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, "42");
        assert_eq!(back.iss, "chirp-access");
    }
}
