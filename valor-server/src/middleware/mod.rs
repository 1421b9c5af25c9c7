//! HTTP 中间件
//!
//! - [`logging_middleware`] - 请求日志
//! - [`security_headers`] - 安全响应头

pub mod logging;
pub mod security_headers;

pub use logging::logging_middleware;
pub use security_headers::security_headers;
