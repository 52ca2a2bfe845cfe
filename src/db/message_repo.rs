//! Message persistence.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::message::{Message, MessagePublic, MessageRow, MessageSortKey};

/// Lookup scoped to the chat: a message id from another chat is not
/// found here.
pub async fn find_in_chat(
    pool: &PgPool,
    chat_id: Uuid,
    message_id: Uuid,
) -> AppResult<Option<Message>> {
    let message =
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1 AND chat_id = $2")
            .bind(message_id)
            .bind(chat_id)
            .fetch_optional(pool)
            .await?;

    Ok(message)
}

pub async fn list_for_chat(
    pool: &PgPool,
    chat_id: Uuid,
    sort: MessageSortKey,
) -> AppResult<Vec<MessagePublic>> {
    let query = format!(
        r#"
        SELECT m.id, m.text, m.chat_id, m.created_at,
               u.id AS author_id, u.username AS author_username,
               u.email AS author_email, u.created_at AS author_created_at
        FROM messages m
        JOIN users u ON u.id = m.user_id
        WHERE m.chat_id = $1
        ORDER BY {}
        "#,
        sort.as_column(),
    );
    let rows = sqlx::query_as::<_, MessageRow>(&query)
        .bind(chat_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn create(
    pool: &PgPool,
    chat_id: Uuid,
    user_id: Uuid,
    text: &str,
) -> AppResult<Message> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (id, text, user_id, chat_id, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, now())
        RETURNING *
        "#,
    )
    .bind(text)
    .bind(user_id)
    .bind(chat_id)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

pub async fn update_text(pool: &PgPool, message_id: Uuid, text: &str) -> AppResult<Message> {
    let message = sqlx::query_as::<_, Message>(
        "UPDATE messages SET text = $2 WHERE id = $1 RETURNING *",
    )
    .bind(message_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

pub async fn delete(pool: &PgPool, message_id: Uuid) -> AppResult<()> {
    sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(())
}
