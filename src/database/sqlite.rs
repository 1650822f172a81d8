//! SQLite implementation of the Database trait
//!
//! This module provides a SQLite-based implementation of the Database trait
//! using rusqlite and tokio-rusqlite for async operations.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::Database;
use crate::error::DbError;
use crate::models::{NewProduct, NewUser, Product, User};

/// SQLite database implementation
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Create a new SQLite database connection
    ///
    /// Use `:memory:` for in-memory database or a file path for persistent storage.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path).await?;

        // Run migrations
        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Create a new in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::new(":memory:").await
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
        let username = user.username().to_string();
        let hashed_password = user.hashed_password().to_string();
        let insert_username = username.clone();
        let insert_hash = hashed_password.clone();

        let result = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO users (username, hashed_password) VALUES (?1, ?2)",
                    rusqlite::params![insert_username, insert_hash],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await;

        match result {
            Ok(id) => Ok(User {
                id,
                username,
                hashed_password,
            }),
            Err(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(DbError::ConstraintViolation(format!(
                    "username '{}' already exists",
                    username
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let username = username.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, username, hashed_password
                    FROM users
                    WHERE username = ?1
                    "#,
                )?;

                let user = stmt
                    .query_row([&username], |row| {
                        Ok(User {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            hashed_password: row.get(2)?,
                        })
                    })
                    .optional()?;

                Ok(user)
            })
            .await
            .map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        self.conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT id, username, hashed_password FROM users ORDER BY id")?;

                let users = stmt
                    .query_map([], |row| {
                        Ok(User {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            hashed_password: row.get(2)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(users)
            })
            .await
            .map_err(Into::into)
    }

    // =========================================================================
    // Product operations
    // =========================================================================

    async fn insert_product(&self, product: &NewProduct) -> Result<Product, DbError> {
        let new_product = product.clone();
        let name = product.name.clone();
        let price = product.price;
        let description = product.description.clone();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO products (name, price, description) VALUES (?1, ?2, ?3)",
                    rusqlite::params![name, price, description],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(new_product.into_product(id))
    }

    async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare("SELECT id, name, price, description FROM products ORDER BY id")?;

                let products = stmt
                    .query_map([], |row| {
                        Ok(Product {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            price: row.get(2)?,
                            description: row.get(3)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(products)
            })
            .await
            .map_err(Into::into)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, DbError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, name, price, description
                    FROM products
                    WHERE id = ?1
                    "#,
                )?;

                let product = stmt
                    .query_row([id], |row| {
                        Ok(Product {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            price: row.get(2)?,
                            description: row.get(3)?,
                        })
                    })
                    .optional()?;

                Ok(product)
            })
            .await
            .map_err(Into::into)
    }
}
