use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::message::MessagePublic;
use super::user::UserPublic;
use super::Meta;

/// Database row for a chat. The owner is a foreign key resolved by
/// join, never a live object reference.
#[derive(Debug, Clone, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Joined row: chat plus its owner's public columns.
#[derive(Debug, FromRow)]
pub struct ChatRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_email: String,
    pub owner_created_at: DateTime<Utc>,
}

/// API projection of a chat with its owner embedded.
#[derive(Debug, Serialize)]
pub struct ChatPublic {
    pub id: Uuid,
    pub name: String,
    pub owner: UserPublic,
    pub created_at: DateTime<Utc>,
}

impl From<ChatRow> for ChatPublic {
    fn from(row: ChatRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            owner: UserPublic {
                id: row.owner_id,
                username: row.owner_username,
                email: row.owner_email,
                created_at: row.owner_created_at,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCreate {
    pub name: String,
}

/// Partial update; only fields present in the request are applied.
#[derive(Debug, Default, Deserialize)]
pub struct ChatUpdate {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub chat: ChatPublic,
}

#[derive(Debug, Serialize)]
pub struct ChatCollection {
    pub meta: Meta,
    pub chats: Vec<ChatPublic>,
}

#[derive(Debug, Serialize)]
pub struct ChatMeta {
    pub message_count: i64,
    pub user_count: i64,
}

/// Chat detail with optionally embedded related collections.
#[derive(Debug, Serialize)]
pub struct ChatDetail {
    pub meta: ChatMeta,
    pub chat: ChatPublic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<MessagePublic>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserPublic>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatSortKey {
    Id,
    #[default]
    Name,
    CreatedAt,
}

impl ChatSortKey {
    pub fn as_column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CreatedAt => "created_at",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_omits_collections_that_were_not_requested() {
        let owner = UserPublic {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            created_at: Utc::now(),
        };
        let detail = ChatDetail {
            meta: ChatMeta {
                message_count: 2,
                user_count: 1,
            },
            chat: ChatPublic {
                id: Uuid::new_v4(),
                name: "general".into(),
                owner,
                created_at: Utc::now(),
            },
            messages: None,
            users: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("messages").is_none());
        assert!(json.get("users").is_none());
        assert_eq!(json["meta"]["message_count"], 2);
    }

    #[test]
    fn sort_key_defaults_to_name() {
        #[derive(Deserialize)]
        struct Query {
            #[serde(default)]
            sort: ChatSortKey,
        }

        let q: Query = serde_json::from_str("{}").unwrap();
        assert_eq!(q.sort.as_column(), "name");
    }
}
