//! Authentication system for storefront
//!
//! This module provides authentication functionality:
//! - Password hashing and verification
//! - Signed bearer token issuance and resolution
//! - Credential checks against the user store

pub mod jwt;
pub mod manager;
pub mod password;

pub use jwt::TokenSigner;
pub use manager::{AuthConfig, AuthManager, ACCESS_TOKEN_EXPIRE_MINUTES, DEFAULT_TOKEN_TTL_MINUTES};
pub use password::{hash_password, verify_password, HashError};
