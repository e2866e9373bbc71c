use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use microtest_api::auth::{self, Claims};
use microtest_api::database::models::user::User;
use microtest_api::state::AppState;
use microtest_api::testing::MemoryStore;

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub alice: User,
    pub bob: User,
}

/// App over a fresh in-memory store with two known users.
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let alice = store.seed_user("alice", "alice@example.com", "alicepw");
    let bob = store.seed_user("bob", "bob@example.com", "bobpw");

    let state = AppState::new(store.clone(), store.clone());
    TestApp {
        app: microtest_api::app(state),
        store,
        alice,
        bob,
    }
}

/// Bearer token for a seeded user, signed with the development secret.
pub fn token_for(user: &User) -> String {
    auth::generate_jwt(&Claims::new(user.login.clone(), user.id)).expect("jwt generation")
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, HeaderMap) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, json, headers)
}
