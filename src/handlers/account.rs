use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::{self, Claims};
use crate::config;
use crate::database::models::user::OwnerView;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - Verify credentials and issue a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    debug!(username = %body.username, "REST request to authenticate");

    let user = state
        .users
        .find_by_login(&body.username)
        .await?
        .filter(|user| auth::verify_password(&body.password, &user.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let claims = Claims::new(user.login.clone(), user.id);
    let token = auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;
    Ok(Json(json!({
        "token": token,
        "expires_in": expires_in
    })))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub login: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/register - Create a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    debug!(login = %body.login, "REST request to register user");

    let mut field_errors = HashMap::new();
    if body.login.trim().is_empty() {
        field_errors.insert("login".to_string(), "must not be empty".to_string());
    }
    if body.password.is_empty() {
        field_errors.insert("password".to_string(), "must not be empty".to_string());
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Invalid registration payload",
            Some(field_errors),
        ));
    }

    if state.users.find_by_login(&body.login).await?.is_some() {
        return Err(ApiError::alert(
            "userManagement",
            "userexists",
            "Login name already used",
        ));
    }

    let user = state
        .users
        .create_user(&body.login, &body.email, &auth::hash_password(&body.password))
        .await?;

    Ok((StatusCode::CREATED, Json(OwnerView::from(&user))).into_response())
}

/// GET /api/account - Current user, credential scrubbed
pub async fn get_account(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
) -> Result<Json<OwnerView>, ApiError> {
    debug!(login = %requester.login, "REST request to get account");

    let user = state
        .users
        .find_by_login(&requester.login)
        .await?
        .ok_or_else(|| ApiError::not_found("User could not be found"))?;

    Ok(Json(OwnerView::from(&user)))
}

/// GET /api/authenticate - Echo the authenticated login
pub async fn is_authenticated(Extension(requester): Extension<AuthUser>) -> Json<Value> {
    Json(json!({ "login": requester.login }))
}
