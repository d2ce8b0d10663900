pub mod gate;
pub mod password;
pub mod session_store;

pub use gate::Visibility;
pub use session_store::{AuthSession, SessionStore};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by the session cookie. The cookie only names a server-side
/// session; role and device id never leave the process.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sid: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sid: Uuid, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(ttl_hours as i64)).timestamp();

        Self {
            sid,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Session secret not configured")]
    InvalidSecret,

    #[error("Token generation error: {0}")]
    Generation(String),

    #[error("Invalid session token: {0}")]
    Invalid(String),
}

pub fn generate_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify signature and expiry, returning the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| TokenError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}
