use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::resource::{Resource, ResourceKind};
use crate::database::models::user::User;

/// Errors from the persistence boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistent collection of owned resource records. Implementations guarantee
/// atomic per-record reads and writes; no cross-record transaction spans this
/// boundary.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Insert when `id` is unset, otherwise update the matching record.
    /// Returns the persisted form with `id` populated.
    async fn save(&self, kind: ResourceKind, resource: Resource) -> Result<Resource, StoreError>;

    /// Every persisted record of this kind, unfiltered by ownership.
    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<Resource>, StoreError>;

    async fn find_one(&self, kind: ResourceKind, id: i64) -> Result<Option<Resource>, StoreError>;

    /// Remove the record if present. Deleting a nonexistent id is a no-op.
    async fn delete(&self, kind: ResourceKind, id: i64) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// User identity lookup, resolved from the authenticated principal's login.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    async fn create_user(
        &self,
        login: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
}
