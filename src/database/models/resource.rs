use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::user::{OwnerView, User};

/// The two owned-resource collections. Records are structurally identical;
/// the kind selects the table, the entity name used in error alerts, and the
/// URL collection segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Contents,
    UserResource,
}

impl ResourceKind {
    pub fn table(&self) -> &'static str {
        match self {
            ResourceKind::Contents => "contents",
            ResourceKind::UserResource => "user_resource",
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            ResourceKind::Contents => "contents",
            ResourceKind::UserResource => "userResource",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Contents => "contents",
            ResourceKind::UserResource => "user-resources",
        }
    }

    pub fn from_collection(segment: &str) -> Option<Self> {
        match segment {
            "contents" => Some(ResourceKind::Contents),
            "user-resources" => Some(ResourceKind::UserResource),
            _ => None,
        }
    }
}

/// A user-owned record. `id` is assigned by the store on first save and never
/// changes afterwards.
#[derive(Debug, Clone)]
pub struct Resource {
    pub id: Option<i64>,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub owner: Option<User>,
}

/// Identity equality is store-assigned-id equality. A record that has never
/// been saved (`id == None`) is equal to nothing, itself included.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// API response shape: `{id, value, createdAt, owner}` with the owner's
/// credential scrubbed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceView {
    pub id: Option<i64>,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub owner: Option<OwnerView>,
}

impl From<&Resource> for ResourceView {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id,
            value: resource.value.clone(),
            created_at: resource.created_at,
            owner: resource.owner.as_ref().map(OwnerView::from),
        }
    }
}
