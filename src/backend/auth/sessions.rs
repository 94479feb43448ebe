/**
 * Session Tokens
 *
 * HS256 JWT creation and verification. The server only verifies tokens;
 * `create_token` exists for operators issuing tokens out of band and for
 * tests.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime: 30 days
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

/// Create a JWT token for a user, valid for [`DEFAULT_TOKEN_TTL_SECS`]
pub fn create_token(user_id: Uuid, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_with_ttl(user_id, secret, DEFAULT_TOKEN_TTL_SECS)
}

/// Create a JWT token with an explicit lifetime in seconds
pub fn create_token_with_ttl(
    user_id: Uuid,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = now_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}
