pub mod auth_inner;
pub mod auth_middleware;
pub mod host_guard;

pub use auth_middleware::AuthMiddleware;
pub use host_guard::HostGuard;
