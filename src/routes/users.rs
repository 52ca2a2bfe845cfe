//! User endpoints.

use actix_web::{get, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{chat_repo, user_repo};
use crate::error::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::chat::{ChatCollection, ChatSortKey};
use crate::models::user::{UserCollection, UserResponse, UserSortKey, UserUpdate};
use crate::models::Meta;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub sort: UserSortKey,
}

#[derive(Debug, Deserialize)]
pub struct ListChatsQuery {
    #[serde(default)]
    pub sort: ChatSortKey,
}

#[get("/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let users = user_repo::list(&state.db, query.sort).await?;

    Ok(HttpResponse::Ok().json(UserCollection {
        meta: Meta { count: users.len() },
        users,
    }))
}

#[get("/users/me")]
pub async fn get_self(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(UserResponse {
        user: user.0.into(),
    }))
}

#[put("/users/me")]
pub async fn update_self(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<UserUpdate>,
) -> Result<HttpResponse, AppError> {
    let updated = user_repo::update(&state.db, user.0.id, &body).await?;

    tracing::info!(user_id = %updated.id, "user updated");

    Ok(HttpResponse::Ok().json(UserResponse {
        user: updated.into(),
    }))
}

#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let user = user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::EntityNotFound {
            entity_name: "User",
            entity_id: user_id,
        })?;

    Ok(HttpResponse::Ok().json(UserResponse { user: user.into() }))
}

#[get("/users/{user_id}/chats")]
pub async fn get_user_chats(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ListChatsQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if user_repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(AppError::EntityNotFound {
            entity_name: "User",
            entity_id: user_id,
        });
    }

    let chats = chat_repo::list_for_user(&state.db, user_id, query.sort).await?;

    Ok(HttpResponse::Ok().json(ChatCollection {
        meta: Meta { count: chats.len() },
        chats,
    }))
}
