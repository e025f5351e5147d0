//! JWT issuance, verification and revocation.
//!
//! Tokens are HS256, signed with the configured secret key. Logout
//! blacklists the token's `jti` in Redis with a TTL matching the remaining
//! token lifetime, so revoked tokens stay revoked exactly as long as they
//! would otherwise validate.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::warn;
use uuid::Uuid;

use crate::caching::RedisClient;
use crate::config::Settings;
use crate::core::errors::{AppError, AppResult};
use crate::domain::auth::{TokenClaims, TokenKind, TokenPair};
use crate::domain::entities::User;

#[derive(Clone)]
pub struct TokenService {
    secret_key: String,
    expiration_hours: i64,
    refresh_expiration_days: i64,
    cache: RedisClient,
}

impl TokenService {
    pub fn new(settings: &Settings, cache: RedisClient) -> Self {
        Self {
            secret_key: settings.secret_key.clone(),
            expiration_hours: settings.token_expiration_hours,
            refresh_expiration_days: settings.token_refresh_expiration_days,
            cache,
        }
    }

    pub fn generate_access_token(&self, user: &User) -> AppResult<String> {
        self.generate_token(user, TokenKind::Access, Duration::hours(self.expiration_hours))
    }

    pub fn generate_refresh_token(&self, user: &User) -> AppResult<String> {
        self.generate_token(
            user,
            TokenKind::Refresh,
            Duration::days(self.refresh_expiration_days),
        )
    }

    pub fn generate_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user)?,
            refresh_token: self.generate_refresh_token(user)?,
            expires_in: self.expiration_hours * 3600,
        })
    }

    fn generate_token(
        &self,
        user: &User,
        kind: TokenKind,
        lifetime: Duration,
    ) -> AppResult<String> {
        let now = Utc::now();

        let claims = TokenClaims {
            sub: user
                .id_string()
                .ok_or_else(|| AppError::InternalError("user has no id".to_string()))?,
            roles: user.roles.clone(),
            kind,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_ref()),
        )
        .map_err(|e| AppError::InternalError(format!("token generation failed: {e}")))
    }

    /// Signature and expiry validation only; no I/O.
    pub fn decode_claims(&self, token: &str) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidToken
            | jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AppError::AuthenticationError("Invalid token".to_string())
            }
            _ => AppError::AuthenticationError(format!("Token verification failed: {e}")),
        })
    }

    /// Full verification: signature, expiry, access-token kind, blacklist.
    ///
    /// A cache outage does not reject otherwise-valid tokens; revocation is
    /// best-effort and the outage is surfaced by the readiness probe.
    pub async fn verify_access_token(&self, token: &str) -> AppResult<TokenClaims> {
        let claims = self.decode_claims(token)?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::AuthenticationError(
                "Refresh token presented where an access token is required".to_string(),
            ));
        }

        match self.cache.exists(&blacklist_key(&claims.jti)).await {
            Ok(true) => {
                return Err(AppError::AuthenticationError("Token has been revoked".to_string()));
            }
            Ok(false) => {}
            Err(e) => warn!("blacklist lookup unavailable, accepting token: {e}"),
        }

        Ok(claims)
    }

    /// Revokes a token until its natural expiry.
    pub async fn blacklist(&self, jti: &str, expires_at: i64) -> AppResult<()> {
        let remaining = expires_at - Utc::now().timestamp();
        if remaining <= 0 {
            return Ok(());
        }

        self.cache
            .set_with_expiry(&blacklist_key(jti), &"revoked", remaining as u64)
            .await
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> AppResult<&'a str> {
        auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::AuthenticationError("Invalid authorization header".to_string()))
    }
}

fn blacklist_key(jti: &str) -> String {
    format!("token:blacklist:{jti}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use std::collections::HashMap;

    fn test_service() -> TokenService {
        let mut vars = HashMap::new();
        vars.insert("SECRET_KEY".to_string(), "unit-test-secret".to_string());
        vars.insert("ENVIRONMENT".to_string(), "test".to_string());
        let settings = Settings::from_vars(&vars).unwrap();
        let cache = RedisClient::connect(&settings).unwrap();
        TokenService::new(&settings, cache)
    }

    fn test_user() -> User {
        let mut user = User::new(
            "alice@example.com".to_string(),
            "alice".to_string(),
            "Alice".to_string(),
            "$2b$04$hash".to_string(),
        );
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = test_service();
        let user = test_user();

        let token = service.generate_access_token(&user).unwrap();
        let claims = service.decode_claims(&token).unwrap();

        assert_eq!(claims.sub, user.id_string().unwrap());
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.roles, vec!["user".to_string()]);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_pair_kinds_differ() {
        let service = test_service();
        let user = test_user();

        let pair = service.generate_token_pair(&user).unwrap();
        assert_eq!(pair.expires_in, 24 * 3600);

        let access = service.decode_claims(&pair.access_token).unwrap();
        let refresh = service.decode_claims(&pair.refresh_token).unwrap();
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_unsigned_user_cannot_get_token() {
        let service = test_service();
        let mut user = test_user();
        user.id = None;

        assert!(service.generate_access_token(&user).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let user = test_user();

        let mut token = service.generate_access_token(&user).unwrap();
        token.push('x');

        assert!(matches!(
            service.decode_claims(&token),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = test_service();
        let now = Utc::now();

        let claims = TokenClaims {
            sub: ObjectId::new().to_hex(),
            roles: vec!["user".to_string()],
            kind: TokenKind::Access,
            jti: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("unit-test-secret".as_ref()),
        )
        .unwrap();

        let err = service.decode_claims(&token).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = test_service();

        assert_eq!(service.extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("abc.def.ghi").is_err());
    }
}
