use crate::error::{JoblyError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// 连接池配置
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// 等待空闲连接的最长时间
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl PoolConfig {
    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// 只接受 PostgreSQL 连接串
pub fn ensure_postgres_url(url: &str) -> Result<()> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(())
    } else {
        Err(JoblyError::UnsupportedDatabase(url.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// 从数据库 URL 连接并创建 DbPool
    pub async fn connect_with(url: &str, config: &PoolConfig) -> Result<Self> {
        ensure_postgres_url(url)?;
        let pool = config.options().connect(url).await?;
        tracing::info!(max_connections = config.max_connections, "database pool connected");
        Ok(Self { pool })
    }

    /// 创建连接池但不立即建立连接，首次查询时才连接
    pub fn connect_lazy_with(url: &str, config: &PoolConfig) -> Result<Self> {
        ensure_postgres_url(url)?;
        let pool = config.options().connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
