mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{send, test_app, token_for};

#[tokio::test]
async fn login_issues_a_usable_token() -> Result<()> {
    let t = test_app();

    let (status, body, _) = send(
        &t.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "alice", "password": "alicepw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_string();
    assert!(body["expires_in"].as_u64().unwrap() > 0);

    let (status, body, _) = send(&t.app, "GET", "/api/authenticate", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["login"], "alice");
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials() -> Result<()> {
    let t = test_app();

    let (status, _, _) = send(
        &t.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "alice", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        &t.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() -> Result<()> {
    let t = test_app();

    let (status, _, _) = send(&t.app, "GET", "/contents", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&t.app, "GET", "/api/account", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn account_response_scrubs_the_credential() -> Result<()> {
    let t = test_app();
    let token = token_for(&t.alice);

    let (status, body, _) = send(&t.app, "GET", "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["login"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["password"], "");
    Ok(())
}

#[tokio::test]
async fn register_then_login() -> Result<()> {
    let t = test_app();

    let (status, body, _) = send(
        &t.app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"login": "carol", "email": "carol@example.com", "password": "carolpw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["login"], "carol");
    assert_eq!(body["password"], "");

    let (status, _, _) = send(
        &t.app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "carol", "password": "carolpw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Duplicate login is rejected with the stable entity/key pair
    let (status, body, _) = send(
        &t.app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"login": "CAROL", "email": "other@example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorKey"], "userexists");
    Ok(())
}

#[tokio::test]
async fn health_and_root_are_public() -> Result<()> {
    let t = test_app();

    let (status, body, _) = send(&t.app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body, _) = send(&t.app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_string());
    Ok(())
}
