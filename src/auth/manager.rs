//! Authentication manager
//!
//! This module provides the main authentication interface for the application.
//! It verifies credentials, registers users, and issues and resolves bearer
//! tokens. All state it needs is held by the manager itself.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::Algorithm;

use crate::config::{self, ConfigError};
use crate::database::Database;
use crate::error::{AppError, AuthError, DbError};
use crate::models::{AccessToken, NewUser, User, UserCreate};

use super::jwt::{is_hmac, TokenSigner};
use super::password::{hash_password, verify_password, HashError};

/// Token lifetime used when a caller does not pass one
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

/// Token lifetime handed out by the login endpoint
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Configuration for the authentication manager
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret used to sign tokens
    pub secret_key: String,

    /// HMAC algorithm used to sign tokens
    pub algorithm: Algorithm,

    /// Lifetime of tokens issued without an explicit TTL
    pub default_token_ttl: Duration,

    /// Lifetime of tokens issued at login
    pub access_token_ttl: Duration,
}

impl AuthConfig {
    /// Create a configuration with HS256 and the default lifetimes
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            algorithm: Algorithm::HS256,
            default_token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            access_token_ttl: Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES),
        }
    }

    /// Build the runtime configuration from the `auth` settings section
    pub fn from_settings(settings: &config::AuthConfig) -> Result<Self, ConfigError> {
        let secret_key = settings
            .secret_key
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("auth.secret_key".to_string()))?;

        let algorithm = settings.algorithm()?;
        if !is_hmac(algorithm) {
            return Err(ConfigError::InvalidValue(format!(
                "auth.algorithm must be an HMAC algorithm, got {:?}",
                algorithm
            )));
        }

        Ok(Self {
            secret_key,
            algorithm,
            default_token_ttl: lifetime(
                "auth.default_token_ttl_minutes",
                settings.default_token_ttl_minutes,
            )?,
            access_token_ttl: lifetime(
                "auth.access_token_expire_minutes",
                settings.access_token_expire_minutes,
            )?,
        })
    }
}

/// Convert a configured lifetime in minutes, rejecting values chrono cannot hold
pub(crate) fn lifetime(name: &str, minutes: i64) -> Result<Duration, ConfigError> {
    if minutes <= 0 {
        return Err(ConfigError::InvalidValue(format!("{} must be positive", name)));
    }
    Duration::try_minutes(minutes)
        .ok_or_else(|| ConfigError::InvalidValue(format!("{} is out of range: {}", name, minutes)))
}

/// Hash checked when a login names an unknown user
///
/// Keeps the unknown-user path doing the same Argon2 work as a wrong password.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password("storefront-dummy-password").ok())
        .as_deref()
}

/// Authentication manager
///
/// Verifies credentials against the user store and issues and resolves
/// signed bearer tokens. Tokens are stateless: nothing about them is stored,
/// and a valid token can be resolved any number of times.
pub struct AuthManager<D: Database> {
    db: Arc<D>,
    config: AuthConfig,
    signer: TokenSigner,
}

impl<D: Database> AuthManager<D> {
    /// Create a new authentication manager
    pub fn new(db: Arc<D>, config: AuthConfig) -> Self {
        let signer = TokenSigner::new(config.secret_key.as_bytes(), config.algorithm);
        Self { db, config, signer }
    }

    /// Hash a password for storage
    pub fn hash_password(&self, password: &str) -> Result<String, HashError> {
        hash_password(password)
    }

    /// Check a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        verify_password(password, hash)
    }

    /// Verify a username and password
    ///
    /// Returns the stored user on success. An unknown user and a wrong
    /// password produce the same error. Usernames are trimmed the same way
    /// as at registration.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        let user = self
            .db
            .get_user_by_username(username)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to look up user during login");
                AuthError::InvalidCredentials
            })?;

        let Some(user) = user else {
            if let Some(hash) = dummy_hash() {
                verify_password(password, hash);
            }
            tracing::debug!(username = %username, "Unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.hashed_password) {
            tracing::debug!(username = %username, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Authenticate and issue a token with the login lifetime
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let user = self.authenticate(username, password).await?;
        let token = self.issue_token(&user.username, Some(self.config.access_token_ttl))?;

        tracing::info!(username = %user.username, "Issued access token");
        Ok(token)
    }

    /// Issue a signed token for `username`
    ///
    /// `ttl = None` uses the default lifetime.
    pub fn issue_token(
        &self,
        username: &str,
        ttl: Option<Duration>,
    ) -> Result<AccessToken, AuthError> {
        self.issue_token_at(username, ttl, Utc::now())
    }

    /// Issue a signed token as if the current time were `issued_at`
    ///
    /// An expiry past the representable range is clamped to it.
    pub fn issue_token_at(
        &self,
        username: &str,
        ttl: Option<Duration>,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, AuthError> {
        let ttl = ttl.unwrap_or(self.config.default_token_ttl);
        let bound = if ttl < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        };
        let expires_at = issued_at.checked_add_signed(ttl).unwrap_or(bound);
        let token = self.signer.sign(username, issued_at, expires_at)?;
        Ok(AccessToken::bearer(token))
    }

    /// Resolve a token to the username it was issued for
    pub async fn resolve_token(&self, token: &str) -> Result<String, AuthError> {
        self.current_user(token).await.map(|user| user.username)
    }

    /// Resolve a token to the stored user it was issued for
    ///
    /// Fails with `TokenExpired` once the expiry has passed, and with
    /// `TokenInvalid` for a bad signature, a malformed token, or a subject
    /// that no longer exists.
    pub async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.signer.verify(token)?;

        self.db
            .get_user_by_username(&claims.sub)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to look up token subject");
                AuthError::TokenInvalid
            })?
            .ok_or(AuthError::TokenInvalid)
    }

    /// Register a new user with a freshly hashed password
    ///
    /// A taken username fails with `DbError::ConstraintViolation`.
    pub async fn register_user(&self, request: &UserCreate) -> Result<User, AppError> {
        request.validate()?;

        if self
            .db
            .get_user_by_username(request.username.trim())
            .await?
            .is_some()
        {
            return Err(DbError::ConstraintViolation(format!(
                "username '{}' already exists",
                request.username.trim()
            ))
            .into());
        }

        let hashed_password =
            hash_password(&request.password).map_err(|e| AppError::Internal(e.to_string()))?;
        let new_user = NewUser::new(&request.username, hashed_password)?;
        let user = self.db.create_user(&new_user).await?;

        tracing::info!(user_id = user.id, username = %user.username, "Registered user");
        Ok(user)
    }
}
