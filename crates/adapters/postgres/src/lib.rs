//! adapter-postgres - PostgreSQL 适配器
//!
//! 连接池、SQLx 错误映射与内置迁移

mod connection;
mod error_mapper;
mod migration;

pub use connection::*;
pub use error_mapper::*;
pub use migration::*;
