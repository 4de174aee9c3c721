//! 集成测试共用的夹具

#![allow(dead_code)]

use std::sync::Arc;

use wm_location::application::*;
use wm_location::domain::entities::{LayoutRect, LocationNode, RectKind};
use wm_location::domain::value_objects::{LocationId, WarehouseId};
use wm_location::infrastructure::persistence::{
    InMemoryLayoutRepository, InMemoryLocationRepository,
};

pub const MAX_LAYOUT_RECTS: usize = 100;

pub struct Fixture {
    pub warehouse_id: WarehouseId,
    pub locations: Arc<InMemoryLocationRepository>,
    pub layouts: Arc<InMemoryLayoutRepository>,
    pub handler: ServiceHandler,
}

impl Fixture {
    pub fn new() -> Self {
        let locations = Arc::new(InMemoryLocationRepository::new());
        let layouts = Arc::new(InMemoryLayoutRepository::new());
        let handler = ServiceHandler::new(locations.clone(), layouts.clone(), MAX_LAYOUT_RECTS);
        Self {
            warehouse_id: WarehouseId::new(),
            locations,
            layouts,
            handler,
        }
    }

    pub async fn zone(&self, label: &str) -> LocationNode {
        self.handler
            .create_zone(CreateZoneCommand {
                warehouse_id: self.warehouse_id,
                label: label.to_string(),
                description: None,
                expected_code: None,
                operator: None,
            })
            .await
            .unwrap()
    }

    pub async fn aisle(&self, zone_id: LocationId, label: &str, levels: u32) -> CreatedAisle {
        self.handler
            .create_aisle(CreateAisleCommand {
                zone_id,
                label: label.to_string(),
                level_count: levels,
                prepopulate_levels: levels > 1,
                description: None,
                expected_code: None,
                operator: None,
            })
            .await
            .unwrap()
    }

    pub async fn bin(&self, aisle_id: LocationId, label: &str) -> LocationNode {
        self.handler
            .create_bin(CreateBinCommand {
                aisle_id,
                label: label.to_string(),
                description: None,
                expected_code: None,
                operator: None,
            })
            .await
            .unwrap()
    }

    pub async fn deactivate(&self, id: LocationId) -> LocationNode {
        self.handler
            .set_location_active(SetLocationActiveCommand {
                location_id: id,
                is_active: false,
                operator: None,
            })
            .await
            .unwrap()
    }

    pub async fn save_layout(&self, rects: Vec<LayoutRect>) {
        self.handler
            .save_layout(SaveLayoutCommand {
                warehouse_id: self.warehouse_id,
                name: "main floor".to_string(),
                rects,
                operator: None,
            })
            .await
            .unwrap();
    }

    pub async fn generate(&self) -> CompileReport {
        self.handler
            .generate_locations_from_layout(GenerateLocationsCommand {
                warehouse_id: self.warehouse_id,
                operator: None,
            })
            .await
            .unwrap()
    }

    pub async fn codes(&self) -> Vec<String> {
        self.handler
            .list_locations(ListLocationsQuery {
                warehouse_id: self.warehouse_id,
                filter: Default::default(),
            })
            .await
            .unwrap()
            .iter()
            .map(|n| n.code().to_string())
            .collect()
    }
}

pub fn rect(id: &str, kind: RectKind, name: &str, geometry: (f64, f64, f64, f64)) -> LayoutRect {
    LayoutRect::new(id, kind, name, geometry)
}
