//! 服务启动器

use std::error::Error;
use std::future::Future;
use std::net::SocketAddr;

use config::AppConfig;
use tonic::transport::Server;
use tonic::transport::server::Router;
use tracing::{error, info, warn};

use crate::health::{HealthChecker, HealthServer};
use crate::infrastructure::Infrastructure;
use crate::metrics::{MetricsRecorder, PoolMetricsCollector};
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 gRPC 服务
///
/// 1. 加载配置并初始化日志
/// 2. 安装 Prometheus recorder
/// 3. 创建 PostgreSQL 连接池（带重试）
/// 4. 启动健康检查 HTTP 服务器与连接池指标采集
/// 5. 调用 `server_builder` 注册服务
/// 6. 启动服务器并处理 graceful shutdown
///
/// ```ignore
/// run_server("config", |infra, mut server| async move {
///     let service = MyServiceImpl::new(infra.postgres_pool());
///     Ok(server.add_service(MyServiceServer::new(service)))
/// })
/// .await
/// ```
pub async fn run_server<F, Fut>(config_dir: &str, server_builder: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(Infrastructure, Server) -> Fut,
    Fut: Future<Output = Result<Router, Box<dyn Error>>>,
{
    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = match MetricsRecorder::install() {
        Ok(recorder) => Some(recorder),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    let infra = Infrastructure::from_config(config.clone()).await?;

    let pool_handle = PoolMetricsCollector::default().start(infra.clone());

    let health_server = HealthServer::new(
        HealthChecker::new(infra.clone()),
        metrics,
        config.server.health_port(),
    );
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve().await {
            error!("Health server error: {}", e);
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let router = server_builder(infra, Server::builder()).await?;

    info!(%addr, "gRPC server starting");
    router.serve_with_shutdown(addr, shutdown_signal()).await?;

    health_handle.abort();
    pool_handle.abort();

    info!("Service stopped");
    Ok(())
}
