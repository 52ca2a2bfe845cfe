use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid access token")]
    InvalidToken,

    #[error("expired bearer token")]
    ExpiredToken,

    #[error("requires permission to view chat")]
    NoChatPermission,

    #[error("requires permission to edit message")]
    NoMessagePermission,

    #[error("{entity_name} not found: {entity_id}")]
    EntityNotFound {
        entity_name: &'static str,
        entity_id: Uuid,
    },

    #[error("duplicate {field}: {value}")]
    DuplicateValue {
        entity_name: &'static str,
        field: String,
        value: String,
    },

    #[error("database error: {0}")]
    Database(String),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    /// Structured body returned to clients. Storage and configuration
    /// faults collapse into one opaque shape.
    fn json_body(&self) -> serde_json::Value {
        match self {
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::ExpiredToken => {
                json!({
                    "error": "invalid_client",
                    "error_description": self.to_string(),
                })
            }
            AppError::NoChatPermission | AppError::NoMessagePermission => json!({
                "error": "no_permission",
                "error_description": self.to_string(),
            }),
            AppError::EntityNotFound {
                entity_name,
                entity_id,
            } => json!({
                "type": "entity_not_found",
                "entity_name": entity_name,
                "entity_id": entity_id,
            }),
            AppError::DuplicateValue {
                entity_name,
                field,
                value,
            } => json!({
                "type": "duplicate_value",
                "entity_name": entity_name,
                "entity_field": field,
                "entity_field_value": value,
            }),
            AppError::Config(_) | AppError::Database(_) | AppError::Internal => json!({
                "error": "internal_error",
                "error_description": "internal server error",
            }),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NoChatPermission | AppError::NoMessagePermission => StatusCode::FORBIDDEN,
            AppError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.json_body())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {}", err);
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_share_the_invalid_client_discriminator() {
        for err in [
            AppError::InvalidCredentials,
            AppError::InvalidToken,
            AppError::ExpiredToken,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.json_body()["error"], "invalid_client");
        }
    }

    #[test]
    fn credential_and_token_failures_have_distinct_descriptions() {
        assert_eq!(
            AppError::InvalidCredentials.json_body()["error_description"],
            "invalid username or password"
        );
        assert_eq!(
            AppError::InvalidToken.json_body()["error_description"],
            "invalid access token"
        );
        assert_eq!(
            AppError::ExpiredToken.json_body()["error_description"],
            "expired bearer token"
        );
    }

    #[test]
    fn permission_errors_are_forbidden() {
        for err in [AppError::NoChatPermission, AppError::NoMessagePermission] {
            assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
            assert_eq!(err.json_body()["error"], "no_permission");
        }
    }

    #[test]
    fn not_found_body_names_the_entity() {
        let id = Uuid::new_v4();
        let err = AppError::EntityNotFound {
            entity_name: "Chat",
            entity_id: id,
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let body = err.json_body();
        assert_eq!(body["type"], "entity_not_found");
        assert_eq!(body["entity_name"], "Chat");
        assert_eq!(body["entity_id"], id.to_string());
    }

    #[test]
    fn duplicate_body_names_the_field() {
        let err = AppError::DuplicateValue {
            entity_name: "User",
            field: "username".into(),
            value: "alice".into(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = err.json_body();
        assert_eq!(body["type"], "duplicate_value");
        assert_eq!(body["entity_name"], "User");
        assert_eq!(body["entity_field"], "username");
        assert_eq!(body["entity_field_value"], "alice");
    }

    #[test]
    fn storage_faults_never_leak_details() {
        let err = AppError::Database("connection to 10.0.0.7:5432 refused".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.json_body();
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["error_description"], "internal server error");
    }
}
