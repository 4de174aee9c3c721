//! bootstrap - 统一服务启动骨架
//!
//! 配置加载、日志、PostgreSQL 连接池、健康检查与 gRPC 服务器生命周期

mod health;
mod infrastructure;
mod metrics;
mod reflection;
mod runtime;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use self::metrics::*;
pub use reflection::*;
pub use runtime::*;
pub use starter::*;
