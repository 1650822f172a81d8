//! Authentication flow integration tests
//!
//! Tests the authentication system including:
//! - Password login and token issuance
//! - Token expiry and tampering
//! - Bearer protection over HTTP

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::*;
use reqwest::StatusCode;
use storefront::auth::{AuthConfig, AuthManager};
use storefront::error::AuthError;
use storefront::models::UserCreate;

#[tokio::test]
async fn test_issued_token_resolves_to_subject() {
    let state = create_test_state().await;

    let token = state.auth_manager.login("user1", "pwd1").await.unwrap();
    assert_eq!(token.token_type, "bearer");

    let username = state
        .auth_manager
        .resolve_token(&token.access_token)
        .await
        .unwrap();
    assert_eq!(username, "user1");
}

#[tokio::test]
async fn test_token_can_be_resolved_repeatedly() {
    let state = create_test_state().await;
    let token = state.auth_manager.issue_token("user2", None).unwrap();

    for _ in 0..3 {
        let user = state
            .auth_manager
            .current_user(&token.access_token)
            .await
            .unwrap();
        assert_eq!(user.username, "user2");
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let state = create_test_state().await;
    let issued_at = Utc::now() - Duration::minutes(20);
    let token = state
        .auth_manager
        .issue_token_at("user1", Some(Duration::minutes(15)), issued_at)
        .unwrap();

    let result = state.auth_manager.current_user(&token.access_token).await;
    assert_eq!(result.unwrap_err(), AuthError::TokenExpired);
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let state = create_test_state().await;
    let foreign = AuthManager::new(
        Arc::clone(&state.database),
        AuthConfig::new("a-different-secret"),
    );
    let token = foreign.issue_token("user1", None).unwrap();

    let result = state.auth_manager.current_user(&token.access_token).await;
    assert_eq!(result.unwrap_err(), AuthError::TokenInvalid);
}

#[tokio::test]
async fn test_token_for_unknown_subject_is_rejected() {
    let state = create_test_state().await;
    let token = state.auth_manager.issue_token("ghost", None).unwrap();

    let result = state.auth_manager.current_user(&token.access_token).await;
    assert_eq!(result.unwrap_err(), AuthError::TokenInvalid);
}

#[tokio::test]
async fn test_registered_user_can_log_in() {
    let state = create_test_state().await;
    let request = UserCreate {
        username: "frank".to_string(),
        password: "s3cret".to_string(),
    };
    state.auth_manager.register_user(&request).await.unwrap();

    assert!(state.auth_manager.login("frank", "s3cret").await.is_ok());
    assert_eq!(
        state.auth_manager.login("frank", "wrong").await.unwrap_err(),
        AuthError::InvalidCredentials
    );
}

#[tokio::test]
async fn test_login_over_http() {
    let (addr, shutdown) = run_test_server(create_test_state().await).await;
    let client = reqwest::Client::new();

    let token = login(&client, addr, "user1", "pwd1").await;

    let response = client
        .get(format!("http://{}/me", addr))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], "user1");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_wrong_password_over_http() {
    let (addr, shutdown) = run_test_server(create_test_state().await).await;
    let client = reqwest::Client::new();

    let response = post_login(&client, addr, "user1", "nope").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::WWW_AUTHENTICATE)
            .unwrap(),
        "Bearer"
    );

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Incorrect username or password");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_tampered_token_over_http() {
    let (addr, shutdown) = run_test_server(create_test_state().await).await;
    let client = reqwest::Client::new();

    let token = login(&client, addr, "user1", "pwd1").await;
    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let token = format!("{}.{}{}", unsigned, flipped, &signature[1..]);

    let response = client
        .get(format!("http://{}/me", addr))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_missing_authorization_over_http() {
    let (addr, shutdown) = run_test_server(create_test_state().await).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/users", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Could not validate credentials");

    let _ = shutdown.send(());
}
