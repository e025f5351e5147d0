//! Bearer-token authentication middleware.
//!
//! Attach to a scope with [`AuthMiddleware::required`] or a role-specific
//! constructor; protected handlers then read the [`AuthenticatedUser`]
//! extension inserted here.
//!
//! [`AuthenticatedUser`]: crate::domain::auth::AuthenticatedUser

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

use crate::domain::auth::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    mode: AuthMode,
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    pub fn required_with_role(role: &str) -> Self {
        Self {
            mode: AuthMode::Required,
            required_role: Some(RequiredRole::Single(role.to_string())),
        }
    }

    pub fn required_with_roles(roles: Vec<&str>) -> Self {
        Self {
            mode: AuthMode::Required,
            required_role: Some(RequiredRole::Any(
                roles.into_iter().map(str::to_string).collect(),
            )),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode,
            required_role: self.required_role.clone(),
        }))
    }
}
