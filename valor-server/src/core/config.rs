use crate::auth::JwtConfig;
use crate::sequence::{OrderCodeFormat, RetryPolicy};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_PATH | ./data/saint-valor.db | RocksDB 目录 |
/// | DATABASE_NS | saint_valor | SurrealDB namespace |
/// | DATABASE_DB | store | SurrealDB database |
/// | ENVIRONMENT | development | 运行环境 |
/// | FRONTEND_URL | (unset) | CORS allowed origin |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | (unset) | 启动时创建管理员 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// JWT, order code and sequence retry settings are read by their own
/// `from_env` constructors.
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_PATH=/var/lib/saint-valor/db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// RocksDB 数据目录
    pub database_path: String,
    pub database_ns: String,
    pub database_db: String,
    /// 运行环境: development | production
    pub environment: String,
    /// 前端地址 (CORS)，未设置时允许任意来源
    pub frontend_url: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 订单编号格式
    pub order_code: OrderCodeFormat,
    /// 序列冲突重试策略
    pub sequence_retry: RetryPolicy,
    /// 初始管理员账号
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/saint-valor.db".into()),
            database_ns: std::env::var("DATABASE_NS").unwrap_or_else(|_| "saint_valor".into()),
            database_db: std::env::var("DATABASE_DB").unwrap_or_else(|_| "store".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            frontend_url: non_empty_var("FRONTEND_URL"),
            jwt: JwtConfig::default(),
            order_code: OrderCodeFormat::from_env(),
            sequence_retry: RetryPolicy::from_env(),
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// 使用自定义数据库路径覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_database_path(database_path: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
