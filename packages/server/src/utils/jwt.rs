use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // User ID
    pub staff: bool, // Elevated identity
    pub token_type: TokenType,
    pub iat: usize,
    pub exp: usize,
}

/// Access and refresh tokens issued together on login.
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Sign a single token of the given type, valid for `ttl`.
pub fn sign(
    user_id: Uuid,
    is_staff: bool,
    token_type: TokenType,
    ttl: Duration,
    secret: &str,
) -> Result<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow!("token expiry overflows"))?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        staff: is_staff,
        token_type,
        iat: now.timestamp() as usize,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Sign a fresh access token using the configured lifetime.
pub fn sign_access(user_id: Uuid, is_staff: bool, config: &AuthConfig) -> Result<String> {
    sign(
        user_id,
        is_staff,
        TokenType::Access,
        Duration::minutes(config.access_token_ttl_mins),
        &config.jwt_secret,
    )
}

/// Sign an access/refresh pair using the configured lifetimes.
pub fn sign_pair(user_id: Uuid, is_staff: bool, config: &AuthConfig) -> Result<TokenPair> {
    Ok(TokenPair {
        access: sign_access(user_id, is_staff, config)?,
        refresh: sign(
            user_id,
            is_staff,
            TokenType::Refresh,
            Duration::days(config.refresh_token_ttl_days),
            &config.jwt_secret,
        )?,
    })
}

/// Verify and decode a JWT token, rejecting tokens of the wrong type.
pub fn verify(token: &str, expected: TokenType, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    if token_data.claims.token_type != expected {
        return Err(anyhow!(
            "expected {:?} token, got {:?}",
            expected,
            token_data.claims.token_type
        ));
    }
    Ok(token_data.claims)
}
