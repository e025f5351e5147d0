//! Request-time half of the authentication middleware.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, forward_ready};
use actix_web::{Error, HttpMessage, HttpResponse, web};
use futures_util::future::LocalBoxFuture;

use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::auth::{AuthMode, AuthenticatedUser, RequiredRole};

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate(&req).await;

            match (mode, auth_result) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("authentication failed: {err}");
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "error": "authentication_required",
                        "message": "A valid bearer token is required"
                    }));
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    return Ok(res);
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(&user.roles) {
                            log::warn!(
                                "insufficient role for user {} ({:?}), required {:?}",
                                user.user_id,
                                user.roles,
                                required
                            );
                            let response = HttpResponse::Forbidden().json(serde_json::json!({
                                "error": "insufficient_permissions",
                                "message": "You do not have access to this resource"
                            }));
                            let (req, _) = req.into_parts();
                            let res = ServiceResponse::new(req, response).map_into_right_body();
                            return Ok(res);
                        }
                    }

                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    let passes_role = required_role
                        .as_ref()
                        .is_none_or(|required| required.is_satisfied(&user.roles));
                    if passes_role {
                        req.extensions_mut().insert(user);
                    }
                }
                (AuthMode::Optional, Err(_)) => {}
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("application state missing".to_string()))?;

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Missing authorization header".to_string()))?;

    let token = state.tokens.extract_bearer_token(auth_header)?;
    let claims = state.tokens.verify_access_token(token).await?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        roles: claims.roles,
        token: token.to_string(),
        token_id: claims.jti,
        expires_at: claims.exp,
    })
}
