use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Meta;

/// Database row for a user. Only the API projection below ever leaves
/// the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// API projection of a user, without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Request body for registering a new user.
#[derive(Debug, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Form body for the token endpoint (OAuth2 password-grant shape).
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

/// Partial update; only fields present in the request are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserPublic,
}

#[derive(Debug, Serialize)]
pub struct UserCollection {
    pub meta: Meta,
    pub users: Vec<UserPublic>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortKey {
    #[default]
    Id,
    CreatedAt,
}

impl UserSortKey {
    pub fn as_column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CreatedAt => "created_at",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_projection_drops_the_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            created_at: Utc::now(),
        };
        let public: UserPublic = user.clone().into();
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn sort_key_parses_and_defaults() {
        #[derive(Deserialize)]
        struct Query {
            #[serde(default)]
            sort: UserSortKey,
        }

        let q: Query = serde_json::from_str(r#"{"sort": "created_at"}"#).unwrap();
        assert_eq!(q.sort.as_column(), "created_at");

        let q: Query = serde_json::from_str("{}").unwrap();
        assert_eq!(q.sort.as_column(), "id");

        assert!(serde_json::from_str::<Query>(r#"{"sort": "password_hash"}"#).is_err());
    }

    #[test]
    fn absent_patch_fields_stay_unset() {
        let patch: UserUpdate = serde_json::from_str(r#"{"username": "bob"}"#).unwrap();
        assert_eq!(patch.username.as_deref(), Some("bob"));
        assert!(patch.email.is_none());
    }
}
