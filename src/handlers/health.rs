//! Health, readiness and liveness probe handlers.
//!
//! These three endpoints are the operational contract consumed by the
//! container health check and the orchestrator:
//!
//! - `GET /api/v1/health/` — 200 whenever the process serves requests.
//! - `GET /api/v1/ready/` — 200 when database and cache are reachable,
//!   503 with the failing dependency named otherwise.
//! - `GET /api/v1/alive/` — 200 while the event loop is responsive.
//!
//! Each probe is independent and read-only; a readiness failure never
//! changes what health or liveness report.

use actix_web::{HttpResponse, get, web};

use crate::core::state::AppState;

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.health.health())
}

#[get("/ready")]
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    let report = state.health.readiness().await;

    if report.is_ready() {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}

#[get("/alive")]
pub async fn liveness_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.health.liveness())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::middleware::NormalizePath;
    use actix_web::{App, test, web};
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    use crate::config::Settings;
    use crate::core::state::AppState;
    use crate::domain::dto::{HealthResponse, LivenessResponse, ReadinessResponse};
    use crate::middlewares::HostGuard;
    use crate::routes::configure_all_routes;

    /// State with nothing listening on either dependency and a short probe
    /// bound, simulating a full outage.
    async fn outage_state() -> web::Data<AppState> {
        let mut vars = HashMap::new();
        vars.insert("SECRET_KEY".to_string(), "test-secret".to_string());
        vars.insert("ENVIRONMENT".to_string(), "test".to_string());
        vars.insert(
            "DATABASE_URL".to_string(),
            "mongodb://192.0.2.1:27017".to_string(),
        );
        vars.insert("CACHE_URL".to_string(), "redis://192.0.2.1:6379".to_string());
        vars.insert("PROBE_TIMEOUT_SECONDS".to_string(), "1".to_string());

        let settings = Settings::from_vars(&vars).unwrap();
        let state = AppState::build(settings).await.unwrap();
        web::Data::new(state)
    }

    macro_rules! probe_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .wrap(HostGuard)
                    .wrap(NormalizePath::trim())
                    .configure(configure_all_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_returns_200_during_dependency_outage() {
        let state = outage_state().await;
        let app = probe_app!(state);

        let req = test::TestRequest::get().uri("/api/v1/health/").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: HealthResponse = test::read_body_json(res).await;
        assert_eq!(body.status, "healthy");
        assert_eq!(body.environment, "test");
    }

    #[actix_web::test]
    async fn test_alive_returns_200_during_dependency_outage() {
        let state = outage_state().await;
        let app = probe_app!(state);

        let req = test::TestRequest::get().uri("/api/v1/alive/").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: LivenessResponse = test::read_body_json(res).await;
        assert_eq!(body.status, "alive");
    }

    #[actix_web::test]
    async fn test_ready_returns_503_naming_failed_dependencies() {
        let state = outage_state().await;
        let app = probe_app!(state);

        let started = Instant::now();
        let req = test::TestRequest::get().uri("/api/v1/ready/").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        // Bounded even with both dependencies black-holed.
        assert!(started.elapsed() < Duration::from_secs(5));

        let body: ReadinessResponse = test::read_body_json(res).await;
        assert_eq!(body.status, "not_ready");
        assert!(!body.checks.database.is_healthy());
        assert!(!body.checks.cache.is_healthy());
        assert!(body.checks.database.error.is_some());
    }

    #[actix_web::test]
    async fn test_probe_independence_and_idempotence() {
        let state = outage_state().await;
        let app = probe_app!(state);

        // Readiness fails first; health and liveness must be unaffected,
        // and repeating every probe yields the same status.
        for _ in 0..2 {
            let res = test::call_service(
                &app,
                test::TestRequest::get().uri("/api/v1/ready/").to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

            let res = test::call_service(
                &app,
                test::TestRequest::get().uri("/api/v1/health/").to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);

            let res = test::call_service(
                &app,
                test::TestRequest::get().uri("/api/v1/alive/").to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn test_disallowed_host_is_rejected() {
        let state = outage_state().await;
        let app = probe_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/v1/health/")
            .insert_header(("Host", "evil.example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
