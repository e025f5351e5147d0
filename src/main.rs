//! Process entrypoint.
//!
//! Boot order: dotenv profile → logging → settings (fatal on error, before
//! the port binds) → store handles → HTTP server. A dependency outage at
//! boot is logged and left to the readiness probe; only configuration
//! errors and a failed port bind abort startup with a non-zero exit.

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use finacle_backend::config::Settings;
use finacle_backend::core::state::AppState;
use finacle_backend::middlewares::HostGuard;
use finacle_backend::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 Finacle backend starting...");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("❌ configuration error: {e}");
            std::process::exit(1);
        }
    };

    if settings.debug {
        info!("⚠️ DEBUG mode is enabled; do not run this configuration in production");
    }
    if let Some(dsn) = &settings.sentry_dsn {
        info!("🛰️ error tracking endpoint configured: {dsn}");
    }

    let state = match AppState::build(settings).await {
        Ok(state) => state,
        Err(e) => {
            error!("❌ configuration error: {e}");
            std::process::exit(1);
        }
    };

    state.warm_up().await;

    start_http_server(state).await
}

/// Binds the configured address and serves until shutdown.
///
/// # Errors
///
/// * `std::io::Error` - the port could not be bound or the server failed.
async fn start_http_server(state: AppState) -> std::io::Result<()> {
    let settings = state.settings.clone();
    let bind_address = settings.bind_address();

    info!(
        "🌐 listening on http://{}:{} ({} workers)",
        bind_address.0, bind_address.1, settings.workers
    );
    info!(
        "📍 health probes: /api/v1/health/ /api/v1/ready/ /api/v1/alive/"
    );

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(settings.rate_limit_per_second)
        .burst_size(settings.rate_limit_burst_size)
        .use_headers()
        .finish()
        .expect("rate limit settings are validated at boot");

    info!(
        "🛡️ rate limiting: {}/s, burst {}",
        settings.rate_limit_per_second, settings.rate_limit_burst_size
    );

    let state = web::Data::new(state);
    let workers = settings.workers;

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&settings))
            .wrap(HostGuard)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(workers)
    .run()
    .await
}

/// Loads the `.env` file for the selected `PROFILE` (`dev`, `prod`, or the
/// plain `.env` fallback). Values already present in the environment win.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            let _ = dotenv::from_filename(".env.prod");
        }
        "dev" => {
            let _ = dotenv::from_filename(".env.dev");
        }
        _ => {
            dotenv().ok();
        }
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS for browser clients. Local frontend origins only; same-origin API
/// traffic and the probes are unaffected.
fn configure_cors(settings: &Settings) -> Cors {
    use actix_web::http::header;

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600);

    let origins = [
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
        format!("http://localhost:{}", settings.port),
        format!("http://127.0.0.1:{}", settings.port),
    ];
    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
