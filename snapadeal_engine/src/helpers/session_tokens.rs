use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode,
    encode,
    errors::ErrorKind,
    Algorithm,
    DecodingKey,
    EncodingKey,
    Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::Role;

/// How long an issued session token stays valid.
pub const SESSION_VALIDITY_DAYS: i64 = 7;

#[derive(Debug, Clone, Error)]
pub enum SessionTokenError {
    #[error("The session token has expired")]
    Expired,
    #[error("The session token is invalid: {0}")]
    Invalid(String),
    #[error("Could not sign the session token: {0}")]
    Signing(String),
}

/// The claims embedded in a session token. `exp` is a unix timestamp, as the JWT spec requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub role: Role,
    pub exp: i64,
}

/// Sign a session token for the user with HMAC-SHA256 and a 7-day expiry.
pub fn issue_session_token(user_id: i64, role: Role, secret: &str) -> Result<String, SessionTokenError> {
    let exp = (Utc::now() + Duration::days(SESSION_VALIDITY_DAYS)).timestamp();
    let claims = SessionClaims { user_id, role, exp };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| SessionTokenError::Signing(e.to_string()))
}

/// Validate a session token's signature and expiry and return its claims.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionTokenError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionTokenError::Expired,
            _ => SessionTokenError::Invalid(e.to_string()),
        })
}

#[cfg(test)]
mod test {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_and_validate_round_trip() {
        let token = issue_session_token(42, Role::Merchant, SECRET).unwrap();
        let claims = validate_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.role, Role::Merchant);
        let week_out = (Utc::now() + Duration::days(SESSION_VALIDITY_DAYS)).timestamp();
        assert!((claims.exp - week_out).abs() < 5);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_session_token(42, Role::Customer, SECRET).unwrap();
        assert!(matches!(validate_session_token(&token, "other-secret"), Err(SessionTokenError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = SessionClaims { user_id: 1, role: Role::Customer, exp: (Utc::now() - Duration::hours(2)).timestamp() };
        let token =
            encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
        assert!(matches!(validate_session_token(&token, SECRET), Err(SessionTokenError::Expired)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_session_token("not.a.token", SECRET).is_err());
    }
}
