//! Saint Valor Server - 珠宝电商后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB (RocksDB) 存储与仓库
//! - **序列** (`sequence`): 原子计数器，生成 `SV-1000-NNN` 订单编号
//! - **订单** (`orders`): 下单流程与金额计算
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! valor-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT 认证、管理员检查
//! ├── api/           # HTTP 路由和处理器
//! ├── middleware/    # 请求日志、安全响应头
//! ├── db/            # 模型和仓库
//! ├── sequence/      # 序列分配器
//! ├── orders/        # 订单服务
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod sequence;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use sequence::{OrderCode, SequenceAllocator, SequenceError, format_order_code};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Security log helper - records security-related events under target `security`
///
/// ```ignore
/// security_log!(WARN, "auth_failed", email = "a@b.com", reason = "invalid_password");
/// security_log!(ERROR, "token_forged", uri = "/api/orders");
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        )
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        )
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        )
    };
}

/// 设置运行环境
///
/// 1. 加载 `.env` (不存在时忽略)
/// 2. 初始化日志 (`LOG_LEVEL`, `LOG_JSON`, `LOG_DIR`)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json = std::env::var("LOG_JSON")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok().filter(|v| !v.trim().is_empty());

    init_logger_with_file(&level, json, log_dir.as_deref())?;
    api::health::mark_started();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____       _       __     _    __      __
  / ___/____ _(_)___  / /_   | |  / /___ _/ /___  _____
  \__ \/ __ `/ / __ \/ __/   | | / / __ `/ / __ \/ ___/
 ___/ / /_/ / / / / / /_     | |/ / /_/ / / /_/ / /
/____/\__,_/_/_/ /_/\__/     |___/\__,_/_/\____/_/
    "#
    );
}
