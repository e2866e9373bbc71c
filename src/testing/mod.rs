//! In-memory store backing the integration tests and the
//! `MICROTEST_STORE=memory` development mode.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::database::models::resource::{Resource, ResourceKind};
use crate::database::models::user::User;
use crate::database::store::{ResourceStore, StoreError, UserDirectory};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_resource_id: i64,
    contents: BTreeMap<i64, Resource>,
    user_resources: BTreeMap<i64, Resource>,
    next_user_id: i64,
    users: Vec<User>,
}

impl Inner {
    fn table_mut(&mut self, kind: ResourceKind) -> &mut BTreeMap<i64, Resource> {
        match kind {
            ResourceKind::Contents => &mut self.contents,
            ResourceKind::UserResource => &mut self.user_resources,
        }
    }

    fn table(&self, kind: ResourceKind) -> &BTreeMap<i64, Resource> {
        match kind {
            ResourceKind::Contents => &self.contents,
            ResourceKind::UserResource => &self.user_resources,
        }
    }
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }

    /// Insert a user directly, hashing the given plaintext password. Test and
    /// dev-mode convenience; the HTTP path goes through `/auth/register`.
    pub fn seed_user(&self, login: &str, email: &str, password: &str) -> User {
        let mut inner = self.lock();
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            login: login.to_string(),
            email: email.to_string(),
            password_hash: crate::auth::hash_password(password),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        user
    }

    /// Number of persisted records of one kind; used by tests to assert the
    /// delete no-op contract.
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.lock().table(kind).len()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn save(&self, kind: ResourceKind, resource: Resource) -> Result<Resource, StoreError> {
        let mut inner = self.lock();
        let id = match resource.id {
            Some(id) => id,
            None => {
                inner.next_resource_id += 1;
                inner.next_resource_id
            }
        };
        let persisted = Resource {
            id: Some(id),
            ..resource
        };
        inner.table_mut(kind).insert(id, persisted.clone());
        Ok(persisted)
    }

    async fn find_all(&self, kind: ResourceKind) -> Result<Vec<Resource>, StoreError> {
        Ok(self.lock().table(kind).values().cloned().collect())
    }

    async fn find_one(&self, kind: ResourceKind, id: i64) -> Result<Option<Resource>, StoreError> {
        Ok(self.lock().table(kind).get(&id).cloned())
    }

    async fn delete(&self, kind: ResourceKind, id: i64) -> Result<(), StoreError> {
        self.lock().table_mut(kind).remove(&id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| user.login.eq_ignore_ascii_case(login))
            .cloned())
    }

    async fn create_user(
        &self,
        login: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.lock();
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            login: login.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(value: &str) -> Resource {
        Resource {
            id: None,
            value: value.to_string(),
            created_at: Utc::now(),
            owner: None,
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids_and_round_trips() {
        let store = MemoryStore::default();
        let input = resource("hello");
        let created_at = input.created_at;

        let saved = store.save(ResourceKind::Contents, input).await.unwrap();
        let id = saved.id.unwrap();
        assert_eq!(id, 1);

        let found = store
            .find_one(ResourceKind::Contents, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.value, "hello");
        assert_eq!(found.created_at, created_at);

        let second = store
            .save(ResourceKind::Contents, resource("again"))
            .await
            .unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn kinds_are_isolated() {
        let store = MemoryStore::default();
        store.save(ResourceKind::Contents, resource("a")).await.unwrap();
        assert_eq!(store.count(ResourceKind::Contents), 1);
        assert_eq!(store.count(ResourceKind::UserResource), 0);
        assert!(store
            .find_all(ResourceKind::UserResource)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent_by_id() {
        let store = MemoryStore::default();
        let saved = store.save(ResourceKind::Contents, resource("a")).await.unwrap();
        let id = saved.id.unwrap();

        store.delete(ResourceKind::Contents, id).await.unwrap();
        assert_eq!(store.count(ResourceKind::Contents), 0);

        // Deleting a nonexistent id is a no-op, not an error
        store.delete(ResourceKind::Contents, id).await.unwrap();
        store.delete(ResourceKind::Contents, 9999).await.unwrap();
        assert_eq!(store.count(ResourceKind::Contents), 0);
    }

    #[tokio::test]
    async fn user_lookup_is_case_insensitive() {
        let store = MemoryStore::default();
        store.seed_user("Alice", "alice@example.com", "pw");

        let found = store.find_by_login("aLICE").await.unwrap().unwrap();
        assert_eq!(found.login, "Alice");
        assert!(store.find_by_login("bob").await.unwrap().is_none());
    }
}
