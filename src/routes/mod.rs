//! Route table.
//!
//! Everything lives under `/api/v1`. The probe endpoints stay outside any
//! auth scope so the orchestrator can always reach them; protected account
//! routes sit behind the bearer-token middleware.

use actix_web::web;

use crate::handlers;
use crate::middlewares::AuthMiddleware;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(handlers::health::health_check)
            .service(handlers::health::readiness_check)
            .service(handlers::health::liveness_check)
            .service(auth_scope()),
    );
}

fn auth_scope() -> actix_web::Scope {
    web::scope("/auth")
        .service(handlers::auth::register)
        .service(handlers::auth::login)
        .service(handlers::auth::verify_token)
        .service(handlers::auth::forgot_password)
        // The empty scope matches the remaining /auth paths; it must be
        // registered after the public routes.
        .service(
            web::scope("")
                .wrap(AuthMiddleware::required())
                .service(handlers::auth::get_profile)
                .service(handlers::auth::update_profile)
                .service(handlers::auth::auth_status)
                .service(handlers::auth::logout),
        )
}
