use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::database::models::resource::{Resource, ResourceKind, ResourceView};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::ownership;
use crate::services::ResourceService;
use crate::state::AppState;

/// Request payload for create and update. `value` is optional at the serde
/// level so the handler can report a field error instead of a bare 422.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePayload {
    pub id: Option<i64>,
    pub value: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub owner: Option<OwnerPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerPayload {
    pub id: Option<i64>,
    pub login: Option<String>,
}

fn resolve_kind(collection: &str) -> Result<ResourceKind, ApiError> {
    ResourceKind::from_collection(collection)
        .ok_or_else(|| ApiError::not_found(format!("no such collection: {}", collection)))
}

/// Payload validation runs before any authorization decision.
fn require_value(payload: &ResourcePayload) -> Result<String, ApiError> {
    match &payload.value {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => {
            let mut field_errors = HashMap::new();
            field_errors.insert("value".to_string(), "must not be empty".to_string());
            Err(ApiError::validation_error(
                "Invalid resource payload",
                Some(field_errors),
            ))
        }
    }
}

/// Absent and forbidden collapse into the same alert so existence never leaks.
fn invalid_id(kind: ResourceKind) -> ApiError {
    ApiError::alert(kind.entity_name(), "idnull", "Invalid id")
}

/// POST /:collection - Create a new resource owned by the requester
pub async fn create(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Path(collection): Path<String>,
    Json(payload): Json<ResourcePayload>,
) -> Result<Response, ApiError> {
    let kind = resolve_kind(&collection)?;
    debug!(entity = kind.entity_name(), "REST request to create resource");

    let value = require_value(&payload)?;

    if payload.id.is_some() {
        return Err(ApiError::alert(
            kind.entity_name(),
            "idexists",
            format!("A new {} cannot already have an ID", kind.entity_name()),
        ));
    }

    // Default the owner to the requester when the payload omits one
    let owner_login = payload
        .owner
        .as_ref()
        .and_then(|owner| owner.login.as_deref())
        .unwrap_or(&requester.login);

    let owner = state
        .users
        .find_by_login(owner_login)
        .await?
        .ok_or_else(|| {
            let mut field_errors = HashMap::new();
            field_errors.insert("owner".to_string(), "no such user".to_string());
            ApiError::validation_error("Invalid resource payload", Some(field_errors))
        })?;

    let resource = Resource {
        id: None,
        value,
        created_at: payload.created_at.unwrap_or_else(Utc::now),
        owner: Some(owner),
    };

    let service = ResourceService::new(kind, state.store.clone());
    let saved = service.save(resource).await?;
    let id = saved
        .id
        .ok_or_else(|| ApiError::internal_server_error("store returned a record without an id"))?;

    let location = format!("/{}/{}", kind.collection(), id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ResourceView::from(&saved)),
    )
        .into_response())
}

/// PUT /:collection - Update an existing resource
pub async fn update(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Path(collection): Path<String>,
    Json(payload): Json<ResourcePayload>,
) -> Result<Response, ApiError> {
    let kind = resolve_kind(&collection)?;
    debug!(entity = kind.entity_name(), "REST request to update resource");

    let value = require_value(&payload)?;

    let Some(id) = payload.id else {
        return Err(invalid_id(kind));
    };

    // The payload must name the requester as owner
    let claims_requester = payload
        .owner
        .as_ref()
        .and_then(|owner| owner.login.as_deref())
        .map(|login| login.eq_ignore_ascii_case(&requester.login))
        .unwrap_or(false);
    if !claims_requester {
        return Err(invalid_id(kind));
    }

    let service = ResourceService::new(kind, state.store.clone());

    // And the persisted record must actually belong to the requester
    let existing = service.find_one(id).await?.ok_or_else(|| invalid_id(kind))?;
    if !ownership::can_update(&requester.login, &existing) {
        return Err(invalid_id(kind));
    }

    let owner = state
        .users
        .find_by_login(&requester.login)
        .await?
        .ok_or_else(|| invalid_id(kind))?;

    let resource = Resource {
        id: Some(id),
        value,
        created_at: payload.created_at.unwrap_or_else(Utc::now),
        owner: Some(owner),
    };
    let saved = service.save(resource).await?;

    Ok((StatusCode::OK, Json(ResourceView::from(&saved))).into_response())
}

/// GET /:collection - List resources owned by the requester
pub async fn list(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Path(collection): Path<String>,
) -> Result<Response, ApiError> {
    let kind = resolve_kind(&collection)?;
    debug!(entity = kind.entity_name(), "REST request to list resources");

    let service = ResourceService::new(kind, state.store.clone());
    let resources = service.find_all().await?;

    // The full-table result never leaves this layer unfiltered
    let views: Vec<ResourceView> = resources
        .iter()
        .filter(|resource| ownership::can_read(&requester.login, resource))
        .map(ResourceView::from)
        .collect();

    Ok(Json(views).into_response())
}

/// GET /:collection/:id - Fetch one resource
pub async fn get_one(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Path((collection, id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let kind = resolve_kind(&collection)?;
    debug!(entity = kind.entity_name(), id, "REST request to get resource");

    let service = ResourceService::new(kind, state.store.clone());
    match service.find_one(id).await? {
        Some(resource) if ownership::can_read(&requester.login, &resource) => {
            Ok(Json(ResourceView::from(&resource)).into_response())
        }
        _ => Err(invalid_id(kind)),
    }
}

/// DELETE /:collection/:id - Delete one resource
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthUser>,
    Path((collection, id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let kind = resolve_kind(&collection)?;
    debug!(entity = kind.entity_name(), id, "REST request to delete resource");

    let service = ResourceService::new(kind, state.store.clone());
    match service.find_one(id).await? {
        Some(resource) if ownership::can_delete(&requester.login, &resource) => {
            service.delete(id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        _ => Err(invalid_id(kind)),
    }
}
