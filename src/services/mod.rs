pub mod health;
pub mod tokens;
pub mod users;

pub use health::HealthService;
pub use tokens::TokenService;
pub use users::UserService;
