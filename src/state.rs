use crate::{config::Config, security::token::TokenIssuer};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenIssuer,
    pub config: Arc<Config>,
}
