//! Chat and membership persistence.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::chat::{Chat, ChatPublic, ChatRow, ChatSortKey};
use crate::models::user::{User, UserPublic, UserSortKey};

const CHAT_WITH_OWNER: &str = r#"
    SELECT c.id, c.name, c.created_at,
           u.id AS owner_id, u.username AS owner_username,
           u.email AS owner_email, u.created_at AS owner_created_at
    FROM chats c
    JOIN users u ON u.id = c.owner_id
"#;

pub async fn find(pool: &PgPool, chat_id: Uuid) -> AppResult<Option<ChatPublic>> {
    let row = sqlx::query_as::<_, ChatRow>(&format!("{CHAT_WITH_OWNER} WHERE c.id = $1"))
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}

pub async fn exists(pool: &PgPool, chat_id: Uuid) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM chats WHERE id = $1)")
        .bind(chat_id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// `None` when the chat does not exist; `Some(is_member)` otherwise.
/// One query resolves both questions.
pub async fn membership_lookup(
    pool: &PgPool,
    chat_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<bool>> {
    let row = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT (m.user_id IS NOT NULL) AS is_member
        FROM chats c
        LEFT JOIN chat_members m ON m.chat_id = c.id AND m.user_id = $2
        WHERE c.id = $1
        "#,
    )
    .bind(chat_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Chats the user belongs to, with owners embedded.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    sort: ChatSortKey,
) -> AppResult<Vec<ChatPublic>> {
    let query = format!(
        r#"
        {CHAT_WITH_OWNER}
        JOIN chat_members m ON m.chat_id = c.id
        WHERE m.user_id = $1
        ORDER BY {}
        "#,
        sort.as_column(),
    );
    let rows = sqlx::query_as::<_, ChatRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Create a chat; the owner is enrolled as its first member in the same
/// transaction.
pub async fn create(pool: &PgPool, owner: &User, name: &str) -> AppResult<Chat> {
    let mut tx = pool.begin().await?;

    let chat = sqlx::query_as::<_, Chat>(
        r#"
        INSERT INTO chats (id, name, owner_id, created_at)
        VALUES (gen_random_uuid(), $1, $2, now())
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(owner.id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO chat_members (chat_id, user_id) VALUES ($1, $2)")
        .bind(chat.id)
        .bind(owner.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(chat)
}

/// Apply a partial rename; returns the updated chat with its owner, or
/// `None` when no such chat exists.
pub async fn rename(
    pool: &PgPool,
    chat_id: Uuid,
    name: Option<&str>,
) -> AppResult<Option<ChatPublic>> {
    let updated = sqlx::query("UPDATE chats SET name = COALESCE($2, name) WHERE id = $1")
        .bind(chat_id)
        .bind(name)
        .execute(pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Ok(None);
    }

    find(pool, chat_id).await
}

/// Memberships and messages go with the chat via cascading deletes.
pub async fn delete(pool: &PgPool, chat_id: Uuid) -> AppResult<bool> {
    let deleted = sqlx::query("DELETE FROM chats WHERE id = $1")
        .bind(chat_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

pub async fn members(
    pool: &PgPool,
    chat_id: Uuid,
    sort: UserSortKey,
) -> AppResult<Vec<UserPublic>> {
    let query = format!(
        r#"
        SELECT u.id, u.username, u.email, u.created_at
        FROM users u
        JOIN chat_members m ON m.user_id = u.id
        WHERE m.chat_id = $1
        ORDER BY {}
        "#,
        sort.as_column(),
    );
    let users = sqlx::query_as::<_, UserPublic>(&query)
        .bind(chat_id)
        .fetch_all(pool)
        .await?;

    Ok(users)
}

/// Idempotent on re-add.
pub async fn add_member(pool: &PgPool, chat_id: Uuid, user_id: Uuid) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_members (chat_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (chat_id, user_id) DO NOTHING
        "#,
    )
    .bind(chat_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn counts(pool: &PgPool, chat_id: Uuid) -> AppResult<(i64, i64)> {
    let counts = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM messages WHERE chat_id = $1),
            (SELECT COUNT(*) FROM chat_members WHERE chat_id = $1)
        "#,
    )
    .bind(chat_id)
    .fetch_one(pool)
    .await?;

    Ok(counts)
}
