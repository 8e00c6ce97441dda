use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, sqlx::FromRow)]
#[allow(dead_code)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    /// Email address
    pub email: String,
    /// Password (minimum 8 characters)
    pub password: String,
}

/// Login doubles as the session check: `{check: true}` (or any login POST
/// arriving with a session cookie) re-verifies the session instead of
/// checking credentials.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub check: Option<bool>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `{id, name}` on success, `{}` when there is no valid session.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserResponse {
    pub fn known(id: i64, name: String) -> Self {
        Self {
            id: Some(id),
            name: Some(name),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Claims of the inner token embedded in the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub iat: usize,
}

/// Payload of the session cookie: the user id plus an inner token binding
/// the same id, re-verified independently of the cookie layer.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub token: String,
}
