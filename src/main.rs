use microtest_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = microtest_api::config::config();
    tracing::info!("Starting microtest API in {:?} mode", config.environment);

    let state = match std::env::var("MICROTEST_STORE").as_deref() {
        Ok("memory") => {
            tracing::warn!("using in-memory store; data will not survive a restart");
            AppState::in_memory()
        }
        _ => AppState::postgres(),
    };

    let app = microtest_api::app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("MICROTEST_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("microtest API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
