//! Account entity stored in the `users` collection.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Supported currency preferences.
pub const SUPPORTED_CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "JPY", "CAD", "AUD"];

/// A registered account. Profile fields are embedded rather than split into
/// a separate collection; the profile is small and always read with the
/// account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub username: String,
    pub display_name: String,
    /// Never serialized into API responses; `UserResponse` carries the
    /// public projection.
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// ISO `YYYY-MM-DD`, validated at the DTO boundary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    pub currency_preference: String,
    pub is_verified: bool,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub fn new(
        email: String,
        username: String,
        display_name: String,
        password_hash: String,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            username,
            display_name,
            password_hash,
            phone_number: None,
            date_of_birth: None,
            currency_preference: "USD".to_string(),
            is_verified: false,
            roles: vec!["user".to_string()],
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Object id rendered as a hex string, `None` before the first insert.
    pub fn id_string(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
