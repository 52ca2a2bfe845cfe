//! Registration and token endpoints.

use actix_web::{post, web, HttpResponse};

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::user::{Registration, TokenForm, UserResponse};
use crate::security::password;
use crate::state::AppState;

#[post("/auth/registration")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Registration>,
) -> Result<HttpResponse, AppError> {
    let Registration {
        username,
        email,
        password,
    } = body.into_inner();

    let username_taken = user_repo::username_exists(&state.db, &username).await?;
    let email_taken = user_repo::email_exists(&state.db, &email).await?;
    match (username_taken, email_taken) {
        (true, true) => {
            return Err(AppError::DuplicateValue {
                entity_name: "User",
                field: "username and email".into(),
                value: format!("username = {username} / email = {email}"),
            });
        }
        (true, false) => {
            return Err(AppError::DuplicateValue {
                entity_name: "User",
                field: "username".into(),
                value: username,
            });
        }
        (false, true) => {
            return Err(AppError::DuplicateValue {
                entity_name: "User",
                field: "email".into(),
                value: email,
            });
        }
        (false, false) => {}
    }

    let cost = state.config.bcrypt_cost;
    let password_hash = web::block(move || password::hash(&password, cost))
        .await
        .map_err(|_| AppError::Internal)??;

    // The existence checks and this insert are not atomic; the unique
    // constraint is the backstop for concurrent registrations and
    // surfaces as the same duplicate error.
    let user = user_repo::create(&state.db, &username, &email, &password_hash).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(HttpResponse::Created().json(UserResponse { user: user.into() }))
}

#[post("/auth/token")]
pub async fn token(
    state: web::Data<AppState>,
    form: web::Form<TokenForm>,
) -> Result<HttpResponse, AppError> {
    let TokenForm { username, password } = form.into_inner();

    // Unknown username and wrong password are indistinguishable to the
    // caller.
    let user = user_repo::find_by_username(&state.db, &username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let hash = user.password_hash.clone();
    let verified = web::block(move || password::verify(&password, &hash))
        .await
        .map_err(|_| AppError::Internal)?;
    if !verified {
        tracing::warn!(username = %username, "failed login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = %user.id, "access token issued");

    Ok(HttpResponse::Ok().json(token))
}
