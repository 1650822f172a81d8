//! User (credential record) models
//!
//! A stored user is the username/password-hash pair checked at login.
//! Password hashes never leave this layer through [`UserResponse`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// User record stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Row ID
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Argon2id PHC string
    pub hashed_password: String,
}

/// A user that has not been stored yet
///
/// Only constructible through [`NewUser::new`], which validates its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    hashed_password: String,
}

impl NewUser {
    /// Build a new user from a username and an already-hashed password
    ///
    /// Surrounding whitespace is stripped from the username.
    pub fn new(
        username: impl AsRef<str>,
        hashed_password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = username.as_ref().trim();
        if username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }

        let hashed_password = hashed_password.into();
        if hashed_password.is_empty() {
            return Err(ValidationError::EmptyPasswordHash);
        }

        Ok(Self {
            username: username.to_string(),
            hashed_password,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }
}

/// Registration payload for `POST /users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
}

impl UserCreate {
    /// Check the payload before any hashing happens
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(())
    }
}

/// Public view of a user (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
