use actix_web::{web, HttpResponse};

pub mod auth;
pub mod chats;
pub mod users;

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        // auth
        .service(auth::register)
        .service(auth::token)
        // users; literal paths go before the {user_id} matchers
        .service(users::list_users)
        .service(users::get_self)
        .service(users::update_self)
        .service(users::get_user)
        .service(users::get_user_chats)
        // chats and messages
        .service(chats::list_chats)
        .service(chats::create_chat)
        .service(chats::get_chat)
        .service(chats::update_chat)
        .service(chats::delete_chat)
        .service(chats::list_messages)
        .service(chats::create_message)
        .service(chats::list_members)
        .service(chats::add_member)
        .service(chats::update_message)
        .service(chats::delete_message);
}
