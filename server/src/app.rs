use std::sync::Arc;

use axum::http::{StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use jobly::DbPool;

use crate::auth::JwtKeys;
use crate::config::ServerConfig;
use crate::errors::json_error;
use crate::routes;

/// 处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(db: DbPool, jwt: JwtKeys) -> Self {
        Self {
            db,
            jwt: Arc::new(jwt),
        }
    }

    /// 按配置建立连接池
    pub async fn connect(config: &ServerConfig) -> jobly::Result<Self> {
        let db = DbPool::connect_with(&config.database_url, &config.pool_config()).await?;
        Ok(Self::new(db, JwtKeys::new(config.jwt_secret())))
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::jobs::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("No route: {}", uri.path()))
}
