//! Authentication and profile handlers under `/api/v1/auth`.

use actix_web::{HttpResponse, get, post, put, web};
use validator::Validate;

use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::{
    AuthStatusResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
    TokenVerificationResponse, UpdateProfileRequest, UserResponse, VerifyTokenRequest,
};

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = state.users.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let (user, tokens) = state.users.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserResponse::from(&user),
        tokens,
    }))
}

/// Stateless token introspection; a bad token surfaces as 401.
#[post("/verify")]
pub async fn verify_token(
    state: web::Data<AppState>,
    payload: web::Json<VerifyTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let claims = state.tokens.verify_access_token(&payload.token).await?;

    Ok(HttpResponse::Ok().json(TokenVerificationResponse {
        valid: true,
        user_id: claims.sub,
        roles: claims.roles,
        expires_at: claims.exp,
    }))
}

#[get("/me")]
pub async fn get_profile(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
    let user = state.users.get_profile(&auth.user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

#[put("/me")]
pub async fn update_profile(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthenticatedUser>,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = state
        .users
        .update_profile(&auth.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

#[get("/status")]
pub async fn auth_status(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
    let user = state.users.get_profile(&auth.user_id).await?;

    Ok(HttpResponse::Ok().json(AuthStatusResponse {
        authenticated: true,
        user: UserResponse::from(&user),
    }))
}

#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
    state.users.logout(&auth).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logged out"
    })))
}

/// Always 202: whether the email belongs to an account is not revealed.
#[post("/forgot-password")]
pub async fn forgot_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state.users.initiate_password_reset(&payload.email).await?;

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "message": "If the account exists, a password reset has been initiated"
    })))
}
