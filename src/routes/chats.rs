//! Chat and message endpoints.
//!
//! Chat-scoped reads and message creation are gated on membership;
//! message mutation is gated on authorship. Rename and delete of a chat
//! are deliberately gated on authentication only: any authenticated
//! caller holding the chat id may rename or delete it.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{chat_repo, message_repo, user_repo};
use crate::error::AppError;
use crate::middleware::auth::CurrentUser;
use crate::middleware::guards::{ChatMember, MessageAuthor};
use crate::models::chat::{
    ChatCollection, ChatCreate, ChatDetail, ChatMeta, ChatPublic, ChatResponse, ChatSortKey,
    ChatUpdate,
};
use crate::models::message::{
    MessageCollection, MessageCreate, MessageResponse, MessageSortKey, MessageUpdate,
};
use crate::models::user::{UserCollection, UserResponse, UserSortKey};
use crate::models::Meta;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListChatsQuery {
    #[serde(default)]
    pub sort: ChatSortKey,
}

#[derive(Debug, Deserialize)]
pub struct ChatDetailQuery {
    /// Comma-separated related collections to embed ("messages", "users").
    pub include: Option<String>,
}

impl ChatDetailQuery {
    fn wants(&self, section: &str) -> bool {
        self.include
            .as_deref()
            .is_some_and(|v| v.split(',').any(|s| s.trim() == section))
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(default)]
    pub sort: MessageSortKey,
}

#[derive(Debug, Deserialize)]
pub struct ListMembersQuery {
    #[serde(default)]
    pub sort: UserSortKey,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

#[get("/chats")]
pub async fn list_chats(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ListChatsQuery>,
) -> Result<HttpResponse, AppError> {
    let chats = chat_repo::list_for_user(&state.db, user.0.id, query.sort).await?;

    Ok(HttpResponse::Ok().json(ChatCollection {
        meta: Meta { count: chats.len() },
        chats,
    }))
}

#[post("/chats")]
pub async fn create_chat(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<ChatCreate>,
) -> Result<HttpResponse, AppError> {
    let chat = chat_repo::create(&state.db, &user.0, &body.name).await?;

    tracing::info!(chat_id = %chat.id, owner_id = %user.0.id, "chat created");

    let chat = ChatPublic {
        id: chat.id,
        name: chat.name,
        created_at: chat.created_at,
        owner: user.0.into(),
    };

    Ok(HttpResponse::Created().json(ChatResponse { chat }))
}

#[get("/chats/{chat_id}")]
pub async fn get_chat(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<ChatDetailQuery>,
) -> Result<HttpResponse, AppError> {
    let chat_id = path.into_inner();
    ChatMember::verify(&state.db, user.0.id, chat_id).await?;

    let chat = chat_repo::find(&state.db, chat_id)
        .await?
        .ok_or(AppError::EntityNotFound {
            entity_name: "Chat",
            entity_id: chat_id,
        })?;
    let (message_count, user_count) = chat_repo::counts(&state.db, chat_id).await?;

    let messages = if query.wants("messages") {
        Some(message_repo::list_for_chat(&state.db, chat_id, MessageSortKey::default()).await?)
    } else {
        None
    };
    let users = if query.wants("users") {
        Some(chat_repo::members(&state.db, chat_id, UserSortKey::default()).await?)
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ChatDetail {
        meta: ChatMeta {
            message_count,
            user_count,
        },
        chat,
        messages,
        users,
    }))
}

#[put("/chats/{chat_id}")]
pub async fn update_chat(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<ChatUpdate>,
) -> Result<HttpResponse, AppError> {
    let chat_id = path.into_inner();
    let chat = chat_repo::rename(&state.db, chat_id, body.name.as_deref())
        .await?
        .ok_or(AppError::EntityNotFound {
            entity_name: "Chat",
            entity_id: chat_id,
        })?;

    Ok(HttpResponse::Ok().json(ChatResponse { chat }))
}

#[delete("/chats/{chat_id}")]
pub async fn delete_chat(
    state: web::Data<AppState>,
    _user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let chat_id = path.into_inner();
    if !chat_repo::delete(&state.db, chat_id).await? {
        return Err(AppError::EntityNotFound {
            entity_name: "Chat",
            entity_id: chat_id,
        });
    }

    tracing::info!(chat_id = %chat_id, "chat deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[get("/chats/{chat_id}/messages")]
pub async fn list_messages(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<ListMessagesQuery>,
) -> Result<HttpResponse, AppError> {
    let chat_id = path.into_inner();
    ChatMember::verify(&state.db, user.0.id, chat_id).await?;

    let messages = message_repo::list_for_chat(&state.db, chat_id, query.sort).await?;

    Ok(HttpResponse::Ok().json(MessageCollection {
        meta: Meta {
            count: messages.len(),
        },
        messages,
    }))
}

#[post("/chats/{chat_id}/messages")]
pub async fn create_message(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<MessageCreate>,
) -> Result<HttpResponse, AppError> {
    let chat_id = path.into_inner();
    let member = ChatMember::verify(&state.db, user.0.id, chat_id).await?;

    let message = message_repo::create(&state.db, member.chat_id, member.user_id, &body.text)
        .await?
        .into_public(user.0.into());

    Ok(HttpResponse::Created().json(MessageResponse { message }))
}

#[get("/chats/{chat_id}/users")]
pub async fn list_members(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<ListMembersQuery>,
) -> Result<HttpResponse, AppError> {
    let chat_id = path.into_inner();
    ChatMember::verify(&state.db, user.0.id, chat_id).await?;

    let users = chat_repo::members(&state.db, chat_id, query.sort).await?;

    Ok(HttpResponse::Ok().json(UserCollection {
        meta: Meta { count: users.len() },
        users,
    }))
}

#[post("/chats/{chat_id}/members")]
pub async fn add_member(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, AppError> {
    let chat_id = path.into_inner();
    ChatMember::verify(&state.db, user.0.id, chat_id).await?;

    let target = user_repo::find_by_id(&state.db, body.user_id)
        .await?
        .ok_or(AppError::EntityNotFound {
            entity_name: "User",
            entity_id: body.user_id,
        })?;

    chat_repo::add_member(&state.db, chat_id, target.id).await?;

    tracing::info!(chat_id = %chat_id, user_id = %target.id, "member added");

    Ok(HttpResponse::Created().json(UserResponse {
        user: target.into(),
    }))
}

#[put("/chats/{chat_id}/messages/{message_id}")]
pub async fn update_message(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<MessageUpdate>,
) -> Result<HttpResponse, AppError> {
    let (chat_id, message_id) = path.into_inner();
    MessageAuthor::verify(&state.db, user.0.id, chat_id, message_id).await?;

    let message = message_repo::update_text(&state.db, message_id, &body.text)
        .await?
        .into_public(user.0.into());

    Ok(HttpResponse::Ok().json(MessageResponse { message }))
}

#[delete("/chats/{chat_id}/messages/{message_id}")]
pub async fn delete_message(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (chat_id, message_id) = path.into_inner();
    let author = MessageAuthor::verify(&state.db, user.0.id, chat_id, message_id).await?;

    message_repo::delete(&state.db, author.message.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
