//! Account registration and login.
//!
//! Error messages here are user-facing and surface verbatim in the REST
//! responses.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use domains::{AuthProvider, DomainError, Result, User, UserRepo};

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_verify: String,
}

pub struct UserService {
    users: Arc<dyn UserRepo>,
    auth: Arc<dyn AuthProvider>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepo>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { users, auth }
    }

    pub async fn register(&self, reg: Registration) -> Result<User> {
        let required = [
            &reg.first_name,
            &reg.last_name,
            &reg.username,
            &reg.email,
            &reg.password,
            &reg.password_verify,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(DomainError::validation("Please enter all required fields."));
        }
        if reg.password.len() < 8 {
            return Err(DomainError::validation(
                "Please enter a password of at least 8 characters.",
            ));
        }
        if reg.password != reg.password_verify {
            return Err(DomainError::validation(
                "Please enter the same password twice.",
            ));
        }
        if self.users.find_by_email(&reg.email).await?.is_some() {
            return Err(DomainError::Conflict(
                "An account with this email address already exists.".into(),
            ));
        }
        if self.users.find_by_username(&reg.username).await?.is_some() {
            return Err(DomainError::Conflict(
                "An account with this username already exists.".into(),
            ));
        }

        let user = User {
            id: Uuid::new_v4(),
            first_name: reg.first_name,
            last_name: reg.last_name,
            username: reg.username,
            email: reg.email,
            password_hash: self.auth.hash_password(&reg.password)?,
            created_at: Utc::now(),
        };
        let user = self.users.create_user(user).await?;
        info!(username = %user.username, "registered user");
        Ok(user)
    }

    /// An identifier containing `@` is matched against email, otherwise
    /// against username.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User> {
        if identifier.trim().is_empty() || password.is_empty() {
            return Err(DomainError::validation("Please enter all required fields."));
        }
        let user = if identifier.contains('@') {
            self.users.find_by_email(identifier).await?
        } else {
            self.users.find_by_username(identifier).await?
        };
        let user = user.ok_or_else(|| {
            DomainError::validation("That email or username is not registered.")
        })?;
        if !self.auth.verify_password(password, &user.password_hash)? {
            return Err(DomainError::validation("That is not the correct password."));
        }
        Ok(user)
    }

    pub async fn find(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User", id.to_string()))
    }
}
