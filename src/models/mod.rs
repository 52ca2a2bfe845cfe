pub mod chat;
pub mod message;
pub mod user;

use serde::Serialize;

/// Collection metadata attached to every listing response.
#[derive(Debug, Serialize)]
pub struct Meta {
    pub count: usize,
}
