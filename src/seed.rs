//! Demo data loaded at startup
//!
//! Seeding is idempotent: existing users are left alone and products are only
//! inserted into an empty table.

use crate::auth::AuthManager;
use crate::database::Database;
use crate::error::AppError;
use crate::models::{NewProduct, UserCreate};

/// Demo products as (name, price, description)
pub const DEMO_PRODUCTS: &[(&str, f64, &str)] = &[
    ("Product 1", 10.99, "Description for Product 1"),
    ("Product 2", 19.99, "Description for Product 2"),
    ("Product 3", 5.99, "Description for Product 3"),
];

/// Demo users as (username, password)
pub const DEMO_USERS: &[(&str, &str)] = &[("user1", "pwd1"), ("user2", "pwd2"), ("user3", "pwd3")];

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub products_inserted: usize,
    pub users_inserted: usize,
}

/// Insert the demo products and users
pub async fn seed_demo_data<D: Database>(
    database: &D,
    auth_manager: &AuthManager<D>,
) -> Result<SeedSummary, AppError> {
    let mut summary = SeedSummary::default();

    if database.list_products().await?.is_empty() {
        for (name, price, description) in DEMO_PRODUCTS {
            database
                .insert_product(&NewProduct::new(*name, *price, *description))
                .await?;
            summary.products_inserted += 1;
        }
    }

    for (username, password) in DEMO_USERS {
        if database.get_user_by_username(username).await?.is_some() {
            tracing::debug!(username = %username, "Demo user already present");
            continue;
        }

        let request = UserCreate {
            username: username.to_string(),
            password: password.to_string(),
        };
        auth_manager.register_user(&request).await?;
        summary.users_inserted += 1;
    }

    tracing::info!(
        products = summary.products_inserted,
        users = summary.users_inserted,
        "Demo data seeded"
    );

    Ok(summary)
}
