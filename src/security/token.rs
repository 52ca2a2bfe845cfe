//! Signed, time-limited bearer tokens.
//!
//! Tokens are self-contained: signature plus embedded expiry means no
//! server-side session store. The only server-side state is the signing
//! secret, loaded once at startup.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Access token claims (aka payload). A token whose payload does not
/// deserialize to exactly this shape is invalid.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// id of the user
    pub sub: String,
    /// unix timestamp
    pub exp: i64,
}

/// Response body for the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> AppResult<AccessToken> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: Utc::now().timestamp() + self.ttl_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| {
                tracing::error!("token signing failed: {}", e);
                AppError::Internal
            })?;

        Ok(AccessToken {
            access_token: token,
            token_type: "Bearer".into(),
            expires_in: self.ttl_secs,
        })
    }

    /// Returns the subject embedded at issuance. Expiry is reported as a
    /// distinct error so callers can prompt re-login specifically.
    pub fn verify(&self, token: &str) -> AppResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            }
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-jwt-key", 3600)
    }

    #[test]
    fn issue_then_verify_returns_the_subject() {
        let user_id = Uuid::new_v4();
        let token = issuer().issue(user_id).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);
        assert_eq!(issuer().verify(&token.access_token).unwrap(), user_id);
    }

    #[test]
    fn expired_token_is_distinguished_from_invalid() {
        let expired = TokenIssuer::new("test-jwt-key", -60)
            .issue(Uuid::new_v4())
            .unwrap();
        let err = issuer().verify(&expired.access_token).unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let forged = TokenIssuer::new("other-secret", 3600)
            .issue(Uuid::new_v4())
            .unwrap();
        let err = issuer().verify(&forged.access_token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(matches!(
            issuer().verify("not-a-token").unwrap_err(),
            AppError::InvalidToken
        ));
        assert!(matches!(
            issuer().verify("").unwrap_err(),
            AppError::InvalidToken
        ));
    }

    #[test]
    fn claims_with_extra_fields_are_invalid() {
        let payload = serde_json::json!({
            "sub": Uuid::new_v4().to_string(),
            "exp": Utc::now().timestamp() + 3600,
            "role": "admin",
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"test-jwt-key"),
        )
        .unwrap();
        assert!(matches!(
            issuer().verify(&token).unwrap_err(),
            AppError::InvalidToken
        ));
    }

    #[test]
    fn non_uuid_subject_is_invalid() {
        let payload = serde_json::json!({
            "sub": "42",
            "exp": Utc::now().timestamp() + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(b"test-jwt-key"),
        )
        .unwrap();
        assert!(matches!(
            issuer().verify(&token).unwrap_err(),
            AppError::InvalidToken
        ));
    }
}
