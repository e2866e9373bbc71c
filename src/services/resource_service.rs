use std::sync::Arc;

use tracing::debug;

use crate::database::models::resource::{Resource, ResourceKind};
use crate::database::store::{ResourceStore, StoreError};

/// Orchestrates store operations for one resource kind.
///
/// The service never sees the requester identity: ownership filtering is the
/// endpoint layer's job, which keeps this layer reusable for any caller.
#[derive(Clone)]
pub struct ResourceService {
    kind: ResourceKind,
    store: Arc<dyn ResourceStore>,
}

impl ResourceService {
    pub fn new(kind: ResourceKind, store: Arc<dyn ResourceStore>) -> Self {
        Self { kind, store }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Insert or update; returns the persisted form with `id` populated.
    pub async fn save(&self, resource: Resource) -> Result<Resource, StoreError> {
        debug!(entity = self.kind.entity_name(), "request to save resource");
        self.store.save(self.kind, resource).await
    }

    pub async fn find_all(&self) -> Result<Vec<Resource>, StoreError> {
        debug!(entity = self.kind.entity_name(), "request to get all resources");
        self.store.find_all(self.kind).await
    }

    pub async fn find_one(&self, id: i64) -> Result<Option<Resource>, StoreError> {
        debug!(entity = self.kind.entity_name(), id, "request to get resource");
        self.store.find_one(self.kind, id).await
    }

    /// Idempotent by id; deleting a nonexistent record is not an error here.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        debug!(entity = self.kind.entity_name(), id, "request to delete resource");
        self.store.delete(self.kind, id).await
    }
}
