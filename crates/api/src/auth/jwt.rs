//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying [`Claims`]. There are no refresh tokens;
//! clients sign in again once `exp` passes.

use aquasurveyor_core::types::DbId;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::env_or;

/// One day.
const DEFAULT_EXPIRY_MINS: i64 = 24 * 60;

/// Clock skew tolerated when checking `exp`, in seconds.
const LEEWAY_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub exp: i64,
    pub iat: i64,
    /// Random per-token id.
    pub jti: String,
}

/// Why a presented token was refused.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until expiry.
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_mins: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` (required) and `JWT_EXPIRY_MINS` (default 1440).
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        Self {
            secret,
            expiry_mins: env_or("JWT_EXPIRY_MINS", DEFAULT_EXPIRY_MINS),
        }
    }

    /// Sign a token for `user_id` valid for the configured lifetime.
    pub fn issue(&self, user_id: DbId) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let ttl = Duration::minutes(self.expiry_mins);
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            expires_in: ttl.num_seconds(),
        })
    }

    /// Check signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config(expiry_mins: i64) -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            expiry_mins,
        }
    }

    #[test]
    fn issued_token_verifies_to_same_subject() {
        let cfg = config(60);
        let issued = cfg.issue(7).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let claims = cfg.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn each_token_gets_its_own_jti() {
        let cfg = config(60);
        let a = cfg.verify(&cfg.issue(1).unwrap().token).unwrap();
        let b = cfg.verify(&cfg.issue(1).unwrap().token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn past_expiry_is_reported_as_expired() {
        let issued = config(-10).issue(1).unwrap();
        assert_matches!(config(60).verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let issued = config(60).issue(1).unwrap();
        let other = JwtConfig {
            secret: "someone-else".to_string(),
            expiry_mins: 60,
        };
        assert_matches!(other.verify(&issued.token), Err(TokenError::Invalid(_)));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_matches!(config(60).verify("abc.def"), Err(TokenError::Invalid(_)));
    }
}
