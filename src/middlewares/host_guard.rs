//! `Host` header allowlist.
//!
//! Requests whose `Host` header is not in the configured allowlist are
//! rejected with 400 before they reach any handler. The default allowlist
//! contains the loopback names, so the container health check always gets
//! through; `*` disables the check entirely.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, HttpResponse, web};
use futures_util::future::LocalBoxFuture;

use crate::core::state::AppState;

#[derive(Default)]
pub struct HostGuard;

impl<S, B> Transform<S, ServiceRequest> for HostGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = HostGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HostGuardService {
            service: Rc::new(service),
        }))
    }
}

pub struct HostGuardService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HostGuardService<S>
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

        let allowed = req
            .app_data::<web::Data<AppState>>()
            .map(|state| {
                let host = req.connection_info().host().to_string();
                let host = host.split(':').next().unwrap_or(&host).to_string();
                state.settings.is_host_allowed(&host)
            })
            // No state means nothing to check against, let the request through.
            .unwrap_or(true);

        Box::pin(async move {
            if !allowed {
                let response = HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "disallowed_host",
                    "message": "Host header does not match ALLOWED_HOSTS"
                }));
                let (req, _) = req.into_parts();
                return Ok(ServiceResponse::new(req, response).map_into_right_body());
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
