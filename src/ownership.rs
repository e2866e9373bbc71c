//! Pure ownership decisions for owned resources.
//!
//! Every predicate takes the requester's login and a resource and returns a
//! plain bool; nothing here touches the store or mutates the record. Owner
//! defaulting on create is handled in the endpoint layer.

use crate::database::models::resource::Resource;

fn owner_matches(login: &str, resource: &Resource) -> bool {
    resource
        .owner
        .as_ref()
        .map(|owner| owner.login.eq_ignore_ascii_case(login))
        .unwrap_or(false)
}

/// A resource is readable only by the user whose login matches the owner's
/// login, case-insensitively. Ownerless records are readable by nobody.
pub fn can_read(login: &str, resource: &Resource) -> bool {
    owner_matches(login, resource)
}

/// Updates additionally require a persisted record: a resource with no id is
/// rejected regardless of ownership.
pub fn can_update(login: &str, resource: &Resource) -> bool {
    resource.id.is_some() && owner_matches(login, resource)
}

pub fn can_delete(login: &str, resource: &Resource) -> bool {
    owner_matches(login, resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::user::User;
    use chrono::Utc;

    fn user(login: &str) -> User {
        User {
            id: 1,
            login: login.to_string(),
            email: format!("{}@example.com", login),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn resource(id: Option<i64>, owner: Option<&str>) -> Resource {
        Resource {
            id,
            value: "hello".to_string(),
            created_at: Utc::now(),
            owner: owner.map(user),
        }
    }

    #[test]
    fn owner_may_read_update_delete() {
        let r = resource(Some(7), Some("alice"));
        assert!(can_read("alice", &r));
        assert!(can_update("alice", &r));
        assert!(can_delete("alice", &r));
    }

    #[test]
    fn login_comparison_is_case_insensitive() {
        let r = resource(Some(7), Some("Alice"));
        assert!(can_read("aLiCe", &r));
        assert!(can_update("ALICE", &r));
        assert!(can_delete("alice", &r));
    }

    #[test]
    fn non_owner_is_denied() {
        let r = resource(Some(7), Some("alice"));
        assert!(!can_read("bob", &r));
        assert!(!can_update("bob", &r));
        assert!(!can_delete("bob", &r));
    }

    #[test]
    fn ownerless_resource_is_invisible_to_everyone() {
        let r = resource(Some(7), None);
        assert!(!can_read("alice", &r));
        assert!(!can_update("alice", &r));
        assert!(!can_delete("alice", &r));
    }

    #[test]
    fn update_requires_persisted_id() {
        let r = resource(None, Some("alice"));
        assert!(!can_update("alice", &r));
        // Read and delete do not care about the id; the endpoint layer never
        // reaches them with an unsaved record anyway
        assert!(can_read("alice", &r));
    }
}
