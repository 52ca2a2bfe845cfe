//! Authorization guards that enforce permission checks at the type level.
//!
//! Handlers obtain a guard value before touching chat-scoped storage, so
//! a missing check is visible in the handler signature.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{chat_repo, message_repo};
use crate::error::{AppError, AppResult};
use crate::models::message::Message;

/// Verified membership of a user in a chat.
#[derive(Debug, Clone, Copy)]
pub struct ChatMember {
    pub user_id: Uuid,
    pub chat_id: Uuid,
}

impl ChatMember {
    /// Chat existence is reported before membership, so a caller learns
    /// "chat missing" before "no permission".
    pub async fn verify(db: &PgPool, user_id: Uuid, chat_id: Uuid) -> AppResult<Self> {
        let membership = chat_repo::membership_lookup(db, chat_id, user_id).await?;
        check_membership(membership, chat_id)?;

        Ok(Self { user_id, chat_id })
    }
}

/// Verified authorship of a message.
#[derive(Debug)]
pub struct MessageAuthor {
    pub message: Message,
}

impl MessageAuthor {
    /// Check order: chat exists, message exists, caller is the author.
    /// Authorship is the only mutation gate; chat role grants nothing.
    pub async fn verify(
        db: &PgPool,
        user_id: Uuid,
        chat_id: Uuid,
        message_id: Uuid,
    ) -> AppResult<Self> {
        if !chat_repo::exists(db, chat_id).await? {
            return Err(AppError::EntityNotFound {
                entity_name: "Chat",
                entity_id: chat_id,
            });
        }

        let message = message_repo::find_in_chat(db, chat_id, message_id)
            .await?
            .ok_or(AppError::EntityNotFound {
                entity_name: "Message",
                entity_id: message_id,
            })?;

        check_author(&message, user_id)?;

        Ok(Self { message })
    }
}

fn check_membership(membership: Option<bool>, chat_id: Uuid) -> AppResult<()> {
    match membership {
        None => Err(AppError::EntityNotFound {
            entity_name: "Chat",
            entity_id: chat_id,
        }),
        Some(false) => Err(AppError::NoChatPermission),
        Some(true) => Ok(()),
    }
}

fn check_author(message: &Message, user_id: Uuid) -> AppResult<()> {
    if message.user_id != user_id {
        return Err(AppError::NoMessagePermission);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(author: Uuid) -> Message {
        Message {
            id: Uuid::new_v4(),
            text: "hello".into(),
            user_id: author,
            chat_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_chat_is_reported_before_membership() {
        let err = check_membership(None, Uuid::new_v4()).unwrap_err();
        assert!(matches!(
            err,
            AppError::EntityNotFound {
                entity_name: "Chat",
                ..
            }
        ));
    }

    #[test]
    fn non_member_is_denied_even_when_the_chat_exists() {
        let err = check_membership(Some(false), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NoChatPermission));
    }

    #[test]
    fn member_passes() {
        assert!(check_membership(Some(true), Uuid::new_v4()).is_ok());
    }

    #[test]
    fn author_may_mutate_own_message() {
        let author = Uuid::new_v4();
        assert!(check_author(&message(author), author).is_ok());
    }

    #[test]
    fn any_other_user_is_denied_regardless_of_chat_role() {
        let msg = message(Uuid::new_v4());
        // chat owners get no special treatment here
        let chat_owner = Uuid::new_v4();
        assert!(matches!(
            check_author(&msg, chat_owner).unwrap_err(),
            AppError::NoMessagePermission
        ));
    }
}
