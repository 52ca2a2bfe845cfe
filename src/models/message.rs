use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserPublic;
use super::Meta;

/// Database row for a message.
#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub user_id: Uuid,
    pub chat_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Joined row: message plus its author's public columns.
#[derive(Debug, FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub text: String,
    pub chat_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_email: String,
    pub author_created_at: DateTime<Utc>,
}

/// API projection of a message with its author embedded.
#[derive(Debug, Serialize)]
pub struct MessagePublic {
    pub id: Uuid,
    pub text: String,
    pub chat_id: Uuid,
    pub user: UserPublic,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRow> for MessagePublic {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            chat_id: row.chat_id,
            created_at: row.created_at,
            user: UserPublic {
                id: row.author_id,
                username: row.author_username,
                email: row.author_email,
                created_at: row.author_created_at,
            },
        }
    }
}

impl Message {
    pub fn into_public(self, author: UserPublic) -> MessagePublic {
        MessagePublic {
            id: self.id,
            text: self.text,
            chat_id: self.chat_id,
            user: author,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageCreate {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageUpdate {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: MessagePublic,
}

#[derive(Debug, Serialize)]
pub struct MessageCollection {
    pub meta: Meta,
    pub messages: Vec<MessagePublic>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSortKey {
    #[default]
    Id,
    Text,
    CreatedAt,
}

impl MessageSortKey {
    pub fn as_column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Text => "text",
            Self::CreatedAt => "created_at",
        }
    }
}
