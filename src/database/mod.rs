//! Database layer for storefront
//!
//! This module defines the database trait and SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewProduct, NewUser, Product, User};

/// Database trait for data persistence
///
/// This trait defines all database operations needed by the application.
/// It uses `async_trait` for async methods and `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Store a new user
    ///
    /// Fails with `DbError::ConstraintViolation` if the username is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User, DbError>;

    /// Look up a user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    /// List all users ordered by ID
    async fn list_users(&self) -> Result<Vec<User>, DbError>;

    // =========================================================================
    // Product operations
    // =========================================================================

    /// Store a new product
    async fn insert_product(&self, product: &NewProduct) -> Result<Product, DbError>;

    /// List all products ordered by ID
    async fn list_products(&self) -> Result<Vec<Product>, DbError>;

    /// Get a product by ID
    async fn get_product(&self, id: i64) -> Result<Option<Product>, DbError>;
}
