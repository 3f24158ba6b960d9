pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod observability;
pub mod routes;

pub use app::{build_app, AppState};
pub use auth::{create_token, AdminUser, Claims, JwtKeys};
pub use config::ServerConfig;
