use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::database::manager::DatabaseManager;
use crate::database::models::resource::{Resource, ResourceKind};
use crate::database::models::user::User;
use crate::database::store::{ResourceStore, StoreError, UserDirectory};

/// PostgreSQL-backed store. Table names come from [`ResourceKind`] only;
/// request input is never interpolated into SQL.
pub struct PgStore;

impl PgStore {
    async fn pool(&self) -> Result<PgPool, StoreError> {
        DatabaseManager::pool().await
    }

    fn select_sql(kind: ResourceKind) -> String {
        format!(
            "SELECT r.id, r.value, r.created_at, \
             u.id AS owner_id, u.login AS owner_login, u.email AS owner_email, \
             u.password_hash AS owner_password_hash, u.created_at AS owner_created_at \
             FROM {} r LEFT JOIN users u ON u.id = r.owner_id",
            kind.table()
        )
    }

    fn resource_from_row(row: &PgRow) -> Result<Resource, StoreError> {
        let owner = match row.try_get::<Option<i64>, _>("owner_id")? {
            Some(owner_id) => Some(User {
                id: owner_id,
                login: row.try_get("owner_login")?,
                email: row.try_get("owner_email")?,
                password_hash: row.try_get("owner_password_hash")?,
                created_at: row.try_get("owner_created_at")?,
            }),
            None => None,
        };

        Ok(Resource {
            id: Some(row.try_get("id")?),
            value: row.try_get("value")?,
            created_at: row.try_get("created_at")?,
            owner,
        })
    }
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn save(&self, kind: ResourceKind, resource: Resource) -> Result<Resource, StoreError> {
        let pool = self.pool().await?;
        let owner_id = resource.owner.as_ref().map(|owner| owner.id);

        let id = match resource.id {
            None => {
                let sql = format!(
                    "INSERT INTO {} (value, created_at, owner_id) VALUES ($1, $2, $3) RETURNING id",
                    kind.table()
                );
                let row = sqlx::query(&sql)
                    .bind(&resource.value)
                    .bind(resource.created_at)
                    .bind(owner_id)
                    .fetch_one(&pool)
                    .await?;
                row.try_get("id")?
            }
            Some(id) => {
                // Last-writer-wins; the id itself is immutable
                let sql = format!(
                    "UPDATE {} SET value = $1, created_at = $2, owner_id = $3 WHERE id = $4",
                    kind.table()
                );
                sqlx::query(&sql)
                    .bind(&resource.value)
                    .bind(resource.created_at)
                    .bind(owner_id)
                    .bind(id)
                    .execute(&pool)
                    .await?;
                id
            }
        };

        Ok(Resource {
            id: Some(id),
            ..resource
        })
    }

    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<Resource>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("{} ORDER BY r.id", Self::select_sql(kind));
        let rows = sqlx::query(&sql).fetch_all(&pool).await?;
        rows.iter().map(Self::resource_from_row).collect()
    }

    async fn find_one(&self, kind: ResourceKind, id: i64) -> Result<Option<Resource>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("{} WHERE r.id = $1", Self::select_sql(kind));
        let row = sqlx::query(&sql).bind(id).fetch_optional(&pool).await?;
        row.as_ref().map(Self::resource_from_row).transpose()
    }

    async fn delete(&self, kind: ResourceKind, id: i64) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        sqlx::query(&sql).bind(id).execute(&pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check().await
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let pool = self.pool().await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, login, email, password_hash, created_at \
             FROM users WHERE lower(login) = lower($1)",
        )
        .bind(login)
        .fetch_optional(&pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        login: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let pool = self.pool().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (login, email, password_hash, created_at) \
             VALUES ($1, $2, $3, now()) \
             RETURNING id, login, email, password_hash, created_at",
        )
        .bind(login)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&pool)
        .await?;

        Ok(user)
    }
}
