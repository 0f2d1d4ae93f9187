//! Credential ports: access tokens and password hashes.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

/// The identity an access token vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and checks the bearer tokens handed out at register/login.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Decode a token, rejecting bad signatures, foreign issuers and expired tokens.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// How long an issued token stays valid.
    fn lifetime(&self) -> TimeDelta;
}

/// One-way password storage.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on a mismatch; `Err` only when `stored_hash` is unreadable.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is not valid: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
