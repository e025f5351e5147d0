//! Account business logic: registration, login, profile management and
//! password-reset initiation.

use log::info;
use uuid::Uuid;

use crate::caching::RedisClient;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::auth::{AuthenticatedUser, TokenPair};
use crate::domain::dto::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::domain::entities::User;
use crate::repositories::UserRepository;
use crate::services::tokens::TokenService;

/// Reset tokens stay redeemable for 30 minutes.
const PASSWORD_RESET_TTL_SECONDS: u64 = 1800;

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    tokens: TokenService,
    cache: RedisClient,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        repo: UserRepository,
        tokens: TokenService,
        cache: RedisClient,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repo,
            tokens,
            cache,
            bcrypt_cost,
        }
    }

    /// # Errors
    ///
    /// `ConflictError` on duplicate email/username, `InternalError` when
    /// hashing fails.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        let password_hash =
            bcrypt::hash(&request.password, self.bcrypt_cost).context("password hashing failed")?;

        let user = User::new(
            request.email.to_lowercase(),
            request.username,
            request.display_name,
            password_hash,
        );

        let user = self.repo.create(user).await?;
        info!("registered user {}", user.username);

        Ok(user)
    }

    /// Verifies credentials and issues a token pair.
    ///
    /// An unknown email and a wrong password produce the same error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, request: LoginRequest) -> AppResult<(User, TokenPair)> {
        let invalid =
            || AppError::AuthenticationError("Invalid email or password".to_string());

        let user = self
            .repo
            .find_by_email(&request.email.to_lowercase())
            .await?
            .ok_or_else(invalid)?;

        let matches = bcrypt::verify(&request.password, &user.password_hash)
            .context("password verification failed")?;

        if !matches {
            return Err(invalid());
        }

        self.repo.record_login(&user).await?;

        let tokens = self.tokens.generate_token_pair(&user)?;

        Ok((user, tokens))
    }

    pub async fn get_profile(&self, user_id: &str) -> AppResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<User> {
        let mut user = self.get_profile(user_id).await?;

        if let Some(display_name) = request.display_name {
            user.display_name = display_name;
        }
        if let Some(phone_number) = request.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(date_of_birth) = request.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(currency) = request.currency_preference {
            user.currency_preference = currency;
        }
        user.updated_at = mongodb::bson::DateTime::now();

        self.repo.update(&user).await?;

        Ok(user)
    }

    /// Revokes the presented access token.
    pub async fn logout(&self, auth: &AuthenticatedUser) -> AppResult<()> {
        self.tokens.blacklist(&auth.token_id, auth.expires_at).await?;
        info!("user {} logged out", auth.user_id);
        Ok(())
    }

    /// Stores an opaque reset token when the account exists. Always
    /// succeeds from the caller's perspective; whether the email is
    /// registered is never revealed.
    pub async fn initiate_password_reset(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.repo.find_by_email(&email.to_lowercase()).await? else {
            return Ok(());
        };

        let Some(user_id) = user.id_string() else {
            return Ok(());
        };

        let reset_token = Uuid::new_v4().to_string();
        self.cache
            .set_with_expiry(
                &format!("password_reset:{reset_token}"),
                &user_id,
                PASSWORD_RESET_TTL_SECONDS,
            )
            .await?;

        // Delivery is handled out of band; only the token issuance lives here.
        info!("password reset initiated for user {user_id}");

        Ok(())
    }
}
