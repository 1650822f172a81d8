//! Domain models for storefront
//!
//! This module contains the core domain models used throughout the application.

pub mod product;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use product::{NewProduct, Product};
pub use token::{AccessToken, Claims, BEARER_TOKEN_TYPE};
pub use user::{NewUser, User, UserCreate, UserResponse};
