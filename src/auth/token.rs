//! Self-contained session tokens: HS256, carrying the user id and expiry.
//!
//! The server holds no session table; every request that needs an identity
//! carries one of these and is verified statelessly.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::Id;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sessions live for a week; clients re-authenticate after that.
pub fn session_validity() -> Duration {
    Duration::days(7)
}

pub fn issue(secret: &[u8], user_id: Id, validity: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + validity).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|_| AuthError::TokenInvalid)
}

/// Checks signature and expiry and returns the referenced user id.
pub fn verify(secret: &[u8], token: &str) -> Result<Id, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    })?;
    data.claims.sub.parse().map_err(|_| AuthError::TokenInvalid)
}
