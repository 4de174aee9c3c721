//! 基础设施资源管理

use adapter_postgres::{PostgresConfig, check_connection, create_pool};
use common::{RetryConfig, is_retryable_error, with_retry};
use config::{AppConfig, DatabaseConfig};
use errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

/// `[database]` 配置段映射为连接池参数
pub fn postgres_config(database: &DatabaseConfig) -> PostgresConfig {
    PostgresConfig::new(database.url.expose_secret())
        .with_pool_size(database.min_connections, database.max_connections)
        .with_acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
        .with_idle_timeout_secs(database.idle_timeout_secs)
}

/// 基础设施资源容器
///
/// 连接池内部为引用计数，克隆开销很小
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
}

/// PostgreSQL 连接池状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub size: u32,
    pub idle: u32,
    pub active: u32,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = postgres_config(&config.database);
        let postgres_pool = with_retry(
            &retry_config,
            "PostgreSQL connection",
            || {
                let cfg = pg_config.clone();
                async move { create_pool(&cfg).await }
            },
            |e| is_retryable_error(&e.to_string()),
        )
        .await?;
        info!(
            max_connections = pg_config.max_connections,
            min_connections = pg_config.min_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            config,
            postgres_pool,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn postgres_pool_status(&self) -> PoolStatus {
        let size = self.postgres_pool.size();
        let idle = self.postgres_pool.num_idle() as u32;
        PoolStatus {
            size,
            idle,
            active: size.saturating_sub(idle),
        }
    }

    pub async fn check_postgres_connection(&self) -> AppResult<()> {
        check_connection(&self.postgres_pool).await
    }
}
