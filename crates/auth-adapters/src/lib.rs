//! Argon2 + JWT implementation of the `AuthProvider` port.
//!
//! Passwords are hashed with Argon2id and never stored in the clear; session
//! tokens are HS256 JWTs carried in an httpOnly cookie.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::{AuthProvider, DomainError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: Uuid,
    /// Expiry, seconds since the epoch.
    exp: i64,
    /// Issued-at, seconds since the epoch.
    iat: i64,
}

pub struct JwtAuthProvider {
    secret: SecretString,
    token_ttl: Duration,
}

impl JwtAuthProvider {
    pub fn new(secret: SecretString, token_ttl_hours: i64) -> Self {
        Self {
            secret,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }
}

impl AuthProvider for JwtAuthProvider {
    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::internal(format!("stored hash is malformed: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn sign_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| DomainError::internal(format!("token signing failed: {e}")))
    }

    fn verify_token(&self, token: &str) -> Result<Uuid> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims.sub)
        .map_err(|_| DomainError::unauthorized("invalid or expired session token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> JwtAuthProvider {
        JwtAuthProvider::new(SecretString::from("test-secret".to_string()), 1)
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let auth = provider();
        let hash = auth.hash_password("hunter22hunter22").unwrap();
        assert!(auth.verify_password("hunter22hunter22", &hash).unwrap());
        assert!(!auth.verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let auth = provider();
        let a = auth.hash_password("same-password").unwrap();
        let b = auth.hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn token_roundtrips_user_id() {
        let auth = provider();
        let user_id = Uuid::new_v4();
        let token = auth.sign_token(user_id).unwrap();
        assert_eq!(auth.verify_token(&token).unwrap(), user_id);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = provider();
        assert!(auth.verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let signer = JwtAuthProvider::new(SecretString::from("secret-a".to_string()), 1);
        let verifier = JwtAuthProvider::new(SecretString::from("secret-b".to_string()), 1);
        let token = signer.sign_token(Uuid::new_v4()).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }
}
