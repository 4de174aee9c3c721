//! Command trait 定义

use async_trait::async_trait;

/// Command trait
///
/// 命令会改变系统状态，`Result` 为成功时的返回值
pub trait Command: Send + Sync {
    type Result: Send;
}

/// Command Handler trait
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    type Error: std::error::Error + Send + Sync;

    async fn handle(&self, command: C) -> Result<C::Result, Self::Error>;
}
