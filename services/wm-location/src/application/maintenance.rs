//! 库位维护：启停用、描述与布局保存

use std::sync::Arc;

use async_trait::async_trait;
use cqrs_core::CommandHandler;
use tracing::info;

use crate::domain::entities::{LocationNode, WarehouseLayout};
use crate::domain::repositories::{LayoutRepository, LocationRepository};
use crate::error::{LocationError, LocationResult};

use super::commands::{SaveLayoutCommand, SetLocationActiveCommand, UpdateLocationDescriptionCommand};

pub struct LocationMaintenance {
    locations: Arc<dyn LocationRepository>,
    layouts: Arc<dyn LayoutRepository>,
    max_layout_rects: usize,
}

impl LocationMaintenance {
    pub fn new(
        locations: Arc<dyn LocationRepository>,
        layouts: Arc<dyn LayoutRepository>,
        max_layout_rects: usize,
    ) -> Self {
        Self {
            locations,
            layouts,
            max_layout_rects,
        }
    }
}

#[async_trait]
impl CommandHandler<SetLocationActiveCommand> for LocationMaintenance {
    type Error = LocationError;

    async fn handle(&self, command: SetLocationActiveCommand) -> LocationResult<LocationNode> {
        let node = self
            .locations
            .set_active(&command.location_id, command.is_active, command.operator)
            .await?;
        info!(
            location_id = %node.id(),
            code = %node.code(),
            is_active = node.is_active(),
            "Location activity changed"
        );
        Ok(node)
    }
}

#[async_trait]
impl CommandHandler<UpdateLocationDescriptionCommand> for LocationMaintenance {
    type Error = LocationError;

    async fn handle(
        &self,
        command: UpdateLocationDescriptionCommand,
    ) -> LocationResult<LocationNode> {
        let node = self
            .locations
            .update_description(&command.location_id, command.description, command.operator)
            .await?;
        info!(location_id = %node.id(), code = %node.code(), "Location description updated");
        Ok(node)
    }
}

#[async_trait]
impl CommandHandler<SaveLayoutCommand> for LocationMaintenance {
    type Error = LocationError;

    async fn handle(&self, command: SaveLayoutCommand) -> LocationResult<WarehouseLayout> {
        let layout = WarehouseLayout::new(command.warehouse_id, command.name.trim(), command.rects);
        layout.validate(self.max_layout_rects)?;

        let saved = self.layouts.save(layout, command.operator).await?;
        info!(
            warehouse_id = %saved.warehouse_id,
            version = saved.version,
            rects = saved.rects.len(),
            "Layout saved"
        );
        Ok(saved)
    }
}
