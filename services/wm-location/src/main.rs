//! wm-location Service - Warehouse Location Hierarchy

use std::sync::Arc;

use adapter_postgres::MigrationManager;
use bootstrap::{Infrastructure, build_reflection, run_server};
use tracing::info;

use wm_location::FILE_DESCRIPTOR_SET;
use wm_location::api::LocationServiceImpl;
use wm_location::application::ServiceHandler;
use wm_location::infrastructure::persistence::{
    PostgresLayoutRepository, PostgresLocationRepository, migrations,
};
use wm_location::proto::location_service_server::LocationServiceServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |infra: Infrastructure, mut server| async move {
        info!("Initializing wm-location Service...");

        let settings = infra.config().location.clone();
        let pool = infra.postgres_pool();

        if settings.run_migrations {
            let result = MigrationManager::new(pool.clone())
                .migrate(&migrations())
                .await?;
            info!(
                applied = result.applied_count(),
                skipped = result.skipped.len(),
                "Migrations finished"
            );
        }

        let location_repo = Arc::new(PostgresLocationRepository::new(pool.clone()));
        let layout_repo = Arc::new(PostgresLayoutRepository::new(pool));
        info!("Repositories initialized");

        let handler = Arc::new(ServiceHandler::new(
            location_repo,
            layout_repo,
            settings.max_layout_rects,
        ));
        let service = LocationServiceImpl::new(handler);

        let reflection_service = build_reflection(&[FILE_DESCRIPTOR_SET])?;

        Ok::<_, Box<dyn std::error::Error>>(
            server
                .add_service(LocationServiceServer::new(service))
                .add_service(reflection_service),
        )
    })
    .await
}
