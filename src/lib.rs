use axum::{routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ownership;
pub mod services;
pub mod state;
pub mod testing;

use state::AppState;

/// Build the full application router on top of the given state.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        // Account endpoints for the authenticated user
        .route("/api/account", get(handlers::account::get_account))
        .route("/api/authenticate", get(handlers::account::is_authenticated))
        // Owned-resource collections: /contents and /user-resources share one
        // handler set keyed by the collection path segment
        .route(
            "/:collection",
            get(handlers::resources::list)
                .post(handlers::resources::create)
                .put(handlers::resources::update),
        )
        .route(
            "/:collection/:id",
            get(handlers::resources::get_one).delete(handlers::resources::delete_one),
        )
        .layer(axum::middleware::from_fn(middleware::auth::jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(handlers::account::login))
        .route("/auth/register", post(handlers::account::register))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "microtest API (Rust)",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/auth/login, /auth/register (public - token acquisition)",
            "account": "/api/account, /api/authenticate (protected)",
            "contents": "/contents[/:id] (protected)",
            "user_resources": "/user-resources[/:id] (protected)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}
