//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use storefront::auth::{AuthConfig, AuthManager};
use storefront::database::{Database, SqliteDatabase};
use storefront::models::AccessToken;
use storefront::seed::seed_demo_data;
use storefront::server::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Create a test authentication manager with the shared test secret
pub fn create_test_auth_manager<D: Database>(db: Arc<D>) -> Arc<AuthManager<D>> {
    Arc::new(AuthManager::new(db, AuthConfig::new(TEST_SECRET)))
}

/// Create a test application state with the demo data loaded
pub async fn create_test_state() -> AppState<SqliteDatabase> {
    let database = create_test_database().await;
    let auth_manager = create_test_auth_manager(Arc::clone(&database));
    seed_demo_data(database.as_ref(), &auth_manager)
        .await
        .expect("Failed to seed test database");

    AppState {
        auth_manager,
        database,
    }
}

/// Run a test server in the background and return the address
/// The server will be shut down when the returned shutdown sender is dropped or sent
pub async fn run_test_server(
    state: AppState<SqliteDatabase>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = storefront::server::build_router(state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}

/// Log in through `POST /token` and return the response
pub async fn post_login(
    client: &reqwest::Client,
    addr: std::net::SocketAddr,
    username: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("http://{}/token", addr))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Failed to send login request")
}

/// Log in and return the bearer token, panicking on failure
pub async fn login(
    client: &reqwest::Client,
    addr: std::net::SocketAddr,
    username: &str,
    password: &str,
) -> String {
    let response = post_login(client, addr, username, password).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response
        .json::<AccessToken>()
        .await
        .expect("Failed to parse token response")
        .access_token
}
