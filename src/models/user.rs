//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::trimmed;

/// Internal row structure, the only type that carries the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            nickname: row.nickname,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Public user record (never includes credentials)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    /// Unique login name
    pub username: String,
    /// Display name, defaults to the username
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 64, message = "Username must be between 3 and 64 characters"),
        custom(function = "trimmed", message = "Username must not start or end with whitespace")
    )]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Nickname must be between 1 and 100 characters"))]
    pub nickname: Option<String>,
}

/// Login request. Fields are optional so a missing field maps to 400 instead of 422.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Update own profile request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 100, message = "Nickname must be between 1 and 100 characters"))]
    pub nickname: Option<String>,
    /// Current password (required to change password)
    pub current_password: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: Option<String>,
}

/// Claims carried by a signed session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user: &User, lifetime_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(lifetime_hours).unwrap_or(i64::MAX / 3600) * 3600;
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now.saturating_add(lifetime),
            iat: now,
        }
    }

    /// Sign the claims into an HS256 JWT
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify signature and expiry, then return the claims
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "alice".to_string(),
            nickname: "Alice".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let claims = SessionClaims::new(&user(), 24);
        let token = claims.create_token("secret").unwrap();
        let parsed = SessionClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed, claims);
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.sub, "alice");
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = SessionClaims::new(&user(), 24).create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "alice".to_string(),
            user_id: 7,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = claims.create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(SessionClaims::from_token("not-a-jwt", "secret").is_err());
        // base64 of {"id":1}, the kind of unsigned token that must never authenticate
        assert!(SessionClaims::from_token("eyJpZCI6MX0=", "secret").is_err());
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            username: "alice".into(),
            password: "secret1".into(),
            nickname: None,
        };
        assert!(ok.validate().is_ok());

        let short_name = RegisterRequest {
            username: "al".into(),
            password: "secret1".into(),
            nickname: None,
        };
        assert!(short_name.validate().is_err());

        let short_password = RegisterRequest {
            username: "alice".into(),
            password: "12345".into(),
            nickname: None,
        };
        assert!(short_password.validate().is_err());

        let padded = RegisterRequest {
            username: " alice ".into(),
            password: "secret1".into(),
            nickname: None,
        };
        let errors = padded.validate().unwrap_err().to_string();
        assert!(errors.contains("whitespace"));
    }
}
