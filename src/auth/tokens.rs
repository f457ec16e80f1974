//! Bearer token minting and verification (HS256 JWTs).
//!
//! The signing secret is read from configuration exactly once at startup
//! and held by a [`TokenIssuer`] that is cloned into every handler.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DoormanError;

/// Minimum accepted signing secret length. Anything shorter than the
/// HMAC-SHA256 block is trivially brute-forceable.
pub const TOKEN_SECRET_MIN_BYTES: usize = 32;

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user name.
    pub sub: String,
    /// Expiration time (seconds since epoch).
    pub exp: u64,
    /// Issued at (seconds since epoch).
    pub iat: u64,
    /// Additional claims minted alongside the registered ones.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Signs and verifies bearer tokens with a single shared HS256 secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Mint a token for `identity`, expiring one TTL from now.
    pub fn mint(
        &self,
        identity: &str,
        extra: HashMap<String, Value>,
    ) -> Result<String, DoormanError> {
        self.mint_at(Utc::now(), identity, extra)
    }

    /// Mint a token as if issued at `issued_at`. Split out from [`mint`](Self::mint)
    /// so expiry behavior can be exercised without waiting out the TTL.
    pub fn mint_at(
        &self,
        issued_at: DateTime<Utc>,
        identity: &str,
        extra: HashMap<String, Value>,
    ) -> Result<String, DoormanError> {
        let claims = Claims {
            sub: identity.to_string(),
            exp: (issued_at + self.ttl).timestamp() as u64,
            iat: issued_at.timestamp() as u64,
            extra,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, DoormanError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DoormanError::TokenExpired,
                _ => DoormanError::InvalidToken,
            })
    }
}
