//! User persistence.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::{User, UserPublic, UserSortKey, UserUpdate};

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn username_exists(pool: &PgPool, username: &str) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn email_exists(pool: &PgPool, email: &str) -> AppResult<bool> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

pub async fn create(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, now())
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| duplicate_or_database(e, username, email))
}

/// Apply a partial update; unset fields keep their stored value.
pub async fn update(pool: &PgPool, user_id: Uuid, patch: &UserUpdate) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            email = COALESCE($3, email)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(patch.username.as_deref())
    .bind(patch.email.as_deref())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        duplicate_or_database(
            e,
            patch.username.as_deref().unwrap_or_default(),
            patch.email.as_deref().unwrap_or_default(),
        )
    })
}

pub async fn list(pool: &PgPool, sort: UserSortKey) -> AppResult<Vec<UserPublic>> {
    let query = format!(
        "SELECT id, username, email, created_at FROM users ORDER BY {}",
        sort.as_column(),
    );
    let users = sqlx::query_as::<_, UserPublic>(&query)
        .fetch_all(pool)
        .await?;

    Ok(users)
}

/// A write that lost the check-then-insert race still reports the same
/// duplicate error the pre-checks produce; everything else is a storage
/// fault.
fn duplicate_or_database(e: sqlx::Error, username: &str, email: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return match db.constraint() {
                Some("users_email_key") => AppError::DuplicateValue {
                    entity_name: "User",
                    field: "email".into(),
                    value: email.into(),
                },
                _ => AppError::DuplicateValue {
                    entity_name: "User",
                    field: "username".into(),
                    value: username.into(),
                },
            };
        }
    }
    e.into()
}
