//! Token-related models
//!
//! This module defines the signed claims carried by a bearer token and the
//! login response handed to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token type reported to clients
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Claims embedded in a signed bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Expiry as unix seconds
    pub exp: i64,

    /// Issue time as unix seconds
    pub iat: i64,
}

impl Claims {
    /// Build claims for `subject` valid from `issued_at` until `expires_at`
    pub fn new(
        subject: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.into(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

/// Response of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Opaque signed token
    pub access_token: String,

    /// Always `bearer`
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: BEARER_TOKEN_TYPE.to_string(),
        }
    }
}
