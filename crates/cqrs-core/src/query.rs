//! Query trait 定义

use async_trait::async_trait;

/// Query trait
///
/// 查询不改变系统状态
pub trait Query: Send + Sync {
    type Result: Send;
}

/// Query Handler trait
#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    type Error: std::error::Error + Send + Sync;

    async fn handle(&self, query: Q) -> Result<Q::Result, Self::Error>;
}

/// 不会失败的查询处理器
///
/// 用于"无结果即空列表"语义的读取端查询
#[async_trait]
pub trait InfallibleQueryHandler<Q: Query>: Send + Sync {
    async fn handle(&self, query: Q) -> Q::Result;
}
