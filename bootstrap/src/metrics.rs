//! Metrics 模块
//!
//! Prometheus 导出与连接池指标采集

use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusHandle};
use tracing::debug;

use crate::infrastructure::{Infrastructure, PoolStatus};

/// Metrics 记录器
#[derive(Clone)]
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 Prometheus recorder
    pub fn install() -> Result<Self, BuildError> {
        Ok(Self {
            handle: telemetry::init_metrics()?,
        })
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 连接池 Metrics 采集器
pub struct PoolMetricsCollector {
    interval: Duration,
}

impl PoolMetricsCollector {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// 启动后台采集任务
    pub fn start(&self, infra: Infrastructure) -> tokio::task::JoinHandle<()> {
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let status = infra.postgres_pool_status();
                record_postgres_pool_metrics(&status);
                debug!(
                    size = status.size,
                    idle = status.idle,
                    active = status.active,
                    "Pool metrics collected"
                );
            }
        })
    }
}

impl Default for PoolMetricsCollector {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

/// 记录 PostgreSQL 连接池指标
pub fn record_postgres_pool_metrics(status: &PoolStatus) {
    metrics::gauge!("postgres_pool_size").set(status.size as f64);
    metrics::gauge!("postgres_pool_idle").set(status.idle as f64);
    metrics::gauge!("postgres_pool_active").set(status.active as f64);
    metrics::gauge!("postgres_pool_utilization").set(pool_utilization(status));
}

/// 连接池使用率（百分比）
pub fn pool_utilization(status: &PoolStatus) -> f64 {
    if status.size == 0 {
        return 0.0;
    }
    status.active as f64 / status.size as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_utilization() {
        let empty = PoolStatus {
            size: 0,
            idle: 0,
            active: 0,
        };
        assert_eq!(pool_utilization(&empty), 0.0);

        let busy = PoolStatus {
            size: 4,
            idle: 1,
            active: 3,
        };
        assert_eq!(pool_utilization(&busy), 75.0);
    }
}
