//! Registration and login.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, validation};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// A freshly authenticated user and their access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, DomainError> {
        let registration = validation::registration(name, email, password)?;

        if self.users.find_by_email(&registration.email).await?.is_some() {
            return Err(DomainError::Duplicate(
                "User already exists with this email".to_string(),
            ));
        }

        let password_hash = self.passwords.hash(password).map_err(internal)?;
        let user = self
            .users
            .insert(User::new(registration.name, registration.email, password_hash))
            .await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.session_for(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let email = validation::email(email).map_err(|e| DomainError::Validation(vec![e]))?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?
        {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Unauthorized);
        }

        self.session_for(user)
    }

    /// The stored user behind an authenticated identity.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    fn session_for(&self, user: User) -> Result<Session, DomainError> {
        let token = self
            .tokens
            .issue(user.id, &user.email)
            .map_err(internal)?;

        Ok(Session {
            user,
            token,
            expires_in: self.tokens.lifetime().num_seconds(),
        })
    }
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}
