//! Outbound response payloads.

use serde::{Deserialize, Serialize};

use crate::domain::auth::TokenPair;
use crate::domain::entities::User;

/// Public projection of a [`User`]; the password hash never leaves the
/// entity layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    pub currency_preference: String,
    pub is_verified: bool,
    pub roles: Vec<String>,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            email: user.email.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            phone_number: user.phone_number.clone(),
            date_of_birth: user.date_of_birth.clone(),
            currency_preference: user.currency_preference.clone(),
            is_verified: user.is_verified,
            roles: user.roles.clone(),
            created_at: user
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenVerificationResponse {
    pub valid: bool,
    pub user_id: String,
    pub roles: Vec<String>,
    pub expires_at: i64,
}

/// Body of `GET /api/v1/auth/status/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub user: UserResponse,
}
