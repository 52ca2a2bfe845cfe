//! Bearer-token authentication extractor.

use std::future::Future;
use std::pin::Pin;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// Authenticated caller, resolved from the bearer token on every
/// request that extracts it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req).map(str::to_owned);

        Box::pin(async move {
            let state = state.ok_or(AppError::Internal)?;
            let token = token.ok_or(AppError::InvalidToken)?;
            let user_id = state.tokens.verify(&token)?;

            // A subject that no longer resolves to a user row is
            // indistinguishable from a forged token at this boundary,
            // and so is a lookup failure.
            let user = user_repo::find_by_id(&state.db, user_id)
                .await
                .map_err(|_| AppError::InvalidToken)?
                .ok_or(AppError::InvalidToken)?;

            Ok(CurrentUser(user))
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
