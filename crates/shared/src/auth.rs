//! Bearer-token primitives that supply the acting user.
//!
//! The ledger core performs no authorization of its own; every orchestrator
//! takes an explicit actor id. This module only turns a bearer token into
//! that actor id at the HTTP boundary.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Token claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID) - the actor stamped onto movement records.
    pub sub: Uuid,
    /// User's role, opaque to the ledger core.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token lifetime in seconds.
    pub token_expiry_secs: u64,
}

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    Encoding(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is invalid.
    #[error("invalid token")]
    Invalid,
}

/// Service for issuing and validating access tokens.
#[derive(Clone)]
pub struct TokenService {
    expiry_secs: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("expiry_secs", &self.expiry_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    /// Creates a new token service from the given configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            expiry_secs: config.token_expiry_secs,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issues an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        #[allow(clippy::cast_possible_wrap)]
        let expires_at = now + Duration::seconds(self.expiry_secs as i64);
        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Validates an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for expired tokens and
    /// `TokenError::Invalid` for anything else that fails validation.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig {
            secret: "test-secret-do-not-use".to_string(),
            token_expiry_secs: 3600,
        })
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let svc = service();
        let user_id = Uuid::new_v4();

        let token = svc.issue(user_id, "warehouse").unwrap();
        let claims = svc.validate(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, "warehouse");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_garbage_token() {
        let svc = service();
        assert!(matches!(
            svc.validate("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_validate_wrong_secret() {
        let svc = service();
        let other = TokenService::new(&AuthConfig {
            secret: "a-different-secret".to_string(),
            token_expiry_secs: 3600,
        });

        let token = svc.issue(Uuid::new_v4(), "admin").unwrap();
        assert!(matches!(other.validate(&token), Err(TokenError::Invalid)));
    }
}
