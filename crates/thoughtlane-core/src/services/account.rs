//! Registration and login.

use std::sync::Arc;

use crate::domain::User;
use crate::error::{DomainError, DomainResult};
use crate::ports::{AuthError, PasswordService, UserRepository};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn register(&self, username: &str, password: &str) -> DomainResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation("Username is required".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate("Username already taken".into()));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .users
            .create(User::new(username.to_string(), password_hash))
            .await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<User> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user)
    }
}
