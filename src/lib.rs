pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod state;

pub use error::{AppError, AppResult};
pub use state::AppState;
