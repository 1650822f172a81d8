//! HTTP router for storefront
//!
//! This module defines the axum router that handles all HTTP requests.
//! It provides routes for:
//! - Root and health checks
//! - Token login
//! - Bearer-protected user and product endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::database::Database;
use crate::error::{AppError, DbError};
use crate::models::{AccessToken, UserCreate, UserResponse};

use super::middleware::{auth_middleware, logging_middleware, AuthResponse, AuthenticatedUser};

/// Shared application state
pub struct AppState<D: Database> {
    /// Authentication manager
    pub auth_manager: Arc<AuthManager<D>>,

    /// Database
    pub database: Arc<D>,
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            auth_manager: Arc::clone(&self.auth_manager),
            database: Arc::clone(&self.database),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Form-encoded login body for `POST /token`
///
/// Extra OAuth2 fields such as `grant_type` and `scope` are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Build the main application router
///
/// # Arguments
///
/// * `state` - Application state containing the store and auth manager
///
/// # Returns
///
/// An axum Router configured with all endpoints
pub fn build_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let protected = Router::new()
        .route("/me", get(me_handler))
        .route(
            "/users",
            get(list_users_handler::<D>).post(create_user_handler::<D>),
        )
        .route("/products", get(list_products_handler::<D>))
        .route("/products/:id", get(get_product_handler::<D>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.auth_manager),
            auth_middleware::<D>,
        ));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/token", post(login_handler::<D>))
        .merge(protected)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Root URL" }))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Exchange a username and password for a bearer token
async fn login_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<AccessToken>, AuthResponse> {
    state
        .auth_manager
        .login(&form.username, &form.password)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::info!(username = %form.username, reason = %e, "Login rejected");
            AuthResponse::incorrect_login()
        })
}

async fn me_handler(Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>) -> impl IntoResponse {
    Json(UserResponse::from(&user))
}

async fn list_users_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
) -> impl IntoResponse {
    match state.database.list_users().await {
        Ok(users) => {
            let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
            (StatusCode::OK, Json(serde_json::json!(users)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list users");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to list users" })),
            )
        }
    }
}

async fn create_user_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Json(request): Json<UserCreate>,
) -> impl IntoResponse {
    match state.auth_manager.register_user(&request).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!(UserResponse::from(&user))),
        ),
        Err(AppError::Database(DbError::ConstraintViolation(_))) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "The user with this username already exists in the system."
            })),
        ),
        Err(AppError::Validation(e)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to create user" })),
            )
        }
    }
}

async fn list_products_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
) -> impl IntoResponse {
    match state.database.list_products().await {
        Ok(products) => (StatusCode::OK, Json(serde_json::json!(products))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list products");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to list products" })),
            )
        }
    }
}

async fn get_product_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.database.get_product(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(serde_json::json!(product))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Product not found" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, product_id = id, "Failed to get product");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to get product" })),
            )
        }
    }
}
