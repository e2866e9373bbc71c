use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Response-shaping view of a user: every field except the credential, which
/// is always serialized as an empty string. This is deliberate response
/// shaping, not a storage mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerView {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for OwnerView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            email: user.email.clone(),
            password: String::new(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_view_scrubs_credential() {
        let user = User {
            id: 1,
            login: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "0123abcd".to_string(),
            created_at: Utc::now(),
        };
        let view = OwnerView::from(&user);
        assert_eq!(view.password, "");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["password"], "");
        assert_eq!(json["login"], "alice");
        assert!(json.get("passwordHash").is_none());
    }
}
