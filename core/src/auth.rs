//! Password hashing and bearer tokens.
//!
//! Passwords are stored as argon2 PHC strings with a random per-user salt.
//! Tokens are HS256 JWTs signed with the configured secret; a caller is
//! "authenticated" when it presents one that validates and has not expired.

use crate::{
    error::{DeskError, DeskResult},
    types::UserId,
};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

// ── Passwords ────────────────────────────────────────────────────────────────

pub fn hash_password(password: &str) -> DeskResult<String> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| DeskError::PasswordHash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DeskError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on a wrong password; `Err` only if the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> DeskResult<bool> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| DeskError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// ── Tokens ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id:   UserId,
    pub name: String,
    pub iat:  u64,
    pub exp:  u64,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header:       Header,
    ttl_seconds:  u64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            header:       Header::new(Algorithm::HS256),
            ttl_seconds,
        }
    }

    pub fn issue(&self, user_id: &str, name: &str) -> DeskResult<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.issue_at(user_id, name, now)
    }

    /// Issue a token as if the current unix time were `issued_at`.
    pub fn issue_at(&self, user_id: &str, name: &str, issued_at: u64) -> DeskResult<String> {
        let claims = Claims {
            id:   user_id.to_string(),
            name: name.to_string(),
            iat:  issued_at,
            exp:  issued_at.saturating_add(self.ttl_seconds),
        };
        Ok(encode(&self.header, &claims, &self.encoding_key)?)
    }

    pub fn validate(&self, token: &str) -> DeskResult<Claims> {
        let mut validation = Validation::new(self.header.alg);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
