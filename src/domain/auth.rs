//! Authentication value types shared by the token service and middleware.

use serde::{Deserialize, Serialize};

/// JWT claim set for access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user's object id as a hex string.
    pub sub: String,
    pub roles: Vec<String>,
    /// Token kind discriminator so a refresh token cannot be presented
    /// where an access token is expected.
    pub kind: TokenKind,
    /// Unique token id, the blacklist key on logout.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Access/refresh pair returned from login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

/// Identity attached to the request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub roles: Vec<String>,
    /// The raw bearer token, kept so logout can blacklist it.
    pub token: String,
    pub token_id: String,
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }
}

/// Whether a route rejects unauthenticated requests or merely enriches
/// authenticated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Required,
    Optional,
}

/// Role constraint attached to a protected route.
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(String),
    Any(Vec<String>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, roles: &[String]) -> bool {
        match self {
            Self::Single(required) => roles.iter().any(|r| r == required),
            Self::Any(any) => any.iter().any(|required| roles.iter().any(|r| r == required)),
        }
    }
}
