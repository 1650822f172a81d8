//! HTTP middleware for storefront
//!
//! This module provides middleware for:
//! - Bearer token authentication
//! - Request/response logging

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthManager;
use crate::database::Database;
use crate::error::AuthError;
use crate::models::User;

/// Authenticated user extension for requests
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub User);

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Authentication middleware function
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Resolves the token to a stored user
/// 3. Adds the authenticated user to the request extensions
pub async fn auth_middleware<D: Database + 'static>(
    State(auth_manager): State<Arc<AuthManager<D>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthResponse> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned)
        .ok_or_else(|| AuthResponse::from_error(AuthError::MissingAuth))?;

    let user = auth_manager.current_user(&token).await.map_err(|e| {
        tracing::debug!(reason = %e, path = %request.uri().path(), "Rejected bearer token");
        AuthResponse::from_error(e)
    })?;

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// Authentication error response
///
/// Always carries `WWW-Authenticate: Bearer`.
#[derive(Debug)]
pub struct AuthResponse {
    status: StatusCode,
    message: String,
}

impl AuthResponse {
    /// Response for a failed bearer check
    ///
    /// The reason is not disclosed to the client.
    pub fn from_error(_error: AuthError) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Could not validate credentials".to_string(),
        }
    }

    /// Response for a failed login
    pub fn incorrect_login() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Incorrect username or password".to_string(),
        }
    }
}

impl IntoResponse for AuthResponse {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });
        (
            self.status,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(body),
        )
            .into_response()
    }
}

/// Logging middleware function
///
/// Logs request and response details including:
/// - Method and path
/// - Status code
/// - Response time
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %elapsed.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{hash_password, AuthConfig};
    use crate::database::MockDatabase;
    use axum::{
        http::{HeaderName, HeaderValue},
        middleware,
        routing::get,
        Extension, Router,
    };
    use axum_test::TestServer;

    fn create_test_auth_manager() -> Arc<AuthManager<MockDatabase>> {
        let user = User {
            id: 1,
            username: "user1".to_string(),
            hashed_password: hash_password("pwd1").unwrap(),
        };

        let mut mock_db = MockDatabase::new();
        mock_db
            .expect_get_user_by_username()
            .returning(move |name| Ok((name == user.username).then(|| user.clone())));

        Arc::new(AuthManager::new(
            Arc::new(mock_db),
            AuthConfig::new("middleware-test-secret"),
        ))
    }

    async fn whoami(Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>) -> String {
        user.username
    }

    fn test_server(auth_manager: Arc<AuthManager<MockDatabase>>) -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(
                auth_manager,
                auth_middleware::<MockDatabase>,
            ));
        TestServer::new(app).unwrap()
    }

    fn authorization(value: &str) -> (HeaderName, HeaderValue) {
        (header::AUTHORIZATION, HeaderValue::from_str(value).unwrap())
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_no_auth() {
        let server = test_server(create_test_auth_manager());

        let response = server.get("/whoami").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.header(header::WWW_AUTHENTICATE), "Bearer");
    }

    #[tokio::test]
    async fn test_auth_middleware_accepts_valid_token() {
        let auth_manager = create_test_auth_manager();
        let token = auth_manager.issue_token("user1", None).unwrap();
        let server = test_server(auth_manager);

        let (name, value) = authorization(&format!("Bearer {}", token.access_token));
        let response = server.get("/whoami").add_header(name, value).await;

        response.assert_status_ok();
        response.assert_text("user1");
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_invalid_token() {
        let server = test_server(create_test_auth_manager());

        let (name, value) = authorization("Bearer not-a-real-token");
        let response = server.get("/whoami").add_header(name, value).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_expired_token() {
        let auth_manager = create_test_auth_manager();
        let issued_at = chrono::Utc::now() - chrono::Duration::hours(2);
        let token = auth_manager
            .issue_token_at("user1", None, issued_at)
            .unwrap();
        let server = test_server(auth_manager);

        let (name, value) = authorization(&format!("Bearer {}", token.access_token));
        let response = server.get("/whoami").add_header(name, value).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_basic_scheme() {
        let server = test_server(create_test_auth_manager());

        let (name, value) = authorization("Basic dXNlcjE6cHdkMQ==");
        let response = server.get("/whoami").add_header(name, value).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_auth_response_messages() {
        let resp = AuthResponse::from_error(AuthError::TokenExpired);
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.message, "Could not validate credentials");

        let resp = AuthResponse::incorrect_login();
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert!(resp.message.contains("Incorrect username or password"));
    }
}
