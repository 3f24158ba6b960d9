use clap::Parser;
use jobly::PoolConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// 服务配置，命令行参数优先，其次环境变量（会先加载 `.env`）
#[derive(Debug, Clone, Parser)]
#[command(name = "jobly-server", version, about = "Jobly job-listing HTTP API")]
pub struct ServerConfig {
    /// PostgreSQL 连接串
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// 监听地址
    #[arg(long, env = "JOBLY_BIND", default_value = "127.0.0.1:3001")]
    pub bind: SocketAddr,

    /// JWT 签名密钥；未设置时使用开发用默认值
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    #[arg(long, env = "JOBLY_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// 等待数据库连接的超时（秒）
    #[arg(long, env = "JOBLY_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub acquire_timeout_secs: u64,
}

pub const DEV_JWT_SECRET: &str = "secret-dev";

impl ServerConfig {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEV_JWT_SECRET)
    }
}
