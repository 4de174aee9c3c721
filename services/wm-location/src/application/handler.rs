//! 应用层入口
//!
//! 组合构建、编译、解析与维护组件，对外提供与 gRPC 接口一一对应的操作

use std::sync::Arc;

use cqrs_core::{CommandHandler, InfallibleQueryHandler, QueryHandler};

use crate::domain::entities::{LocationNode, WarehouseLayout};
use crate::domain::repositories::{LayoutRepository, LocationRepository};
use crate::domain::value_objects::LevelOption;
use crate::error::LocationResult;

use super::builder::HierarchyBuilder;
use super::catalog::LocationCatalog;
use super::commands::*;
use super::compiler::{CompileReport, LayoutCompiler};
use super::maintenance::LocationMaintenance;
use super::queries::*;
use super::resolver::LocationResolver;
use super::tree::TreeNode;

pub struct ServiceHandler {
    builder: HierarchyBuilder,
    compiler: LayoutCompiler,
    resolver: LocationResolver,
    catalog: LocationCatalog,
    maintenance: LocationMaintenance,
}

impl ServiceHandler {
    pub fn new(
        locations: Arc<dyn LocationRepository>,
        layouts: Arc<dyn LayoutRepository>,
        max_layout_rects: usize,
    ) -> Self {
        Self {
            builder: HierarchyBuilder::new(locations.clone()),
            compiler: LayoutCompiler::new(locations.clone(), layouts.clone()),
            resolver: LocationResolver::new(locations.clone()),
            catalog: LocationCatalog::new(locations.clone(), layouts.clone()),
            maintenance: LocationMaintenance::new(locations, layouts, max_layout_rects),
        }
    }

    // ========== 手工构建 ==========

    pub async fn create_zone(&self, cmd: CreateZoneCommand) -> LocationResult<LocationNode> {
        self.builder.handle(cmd).await
    }

    pub async fn create_aisle(&self, cmd: CreateAisleCommand) -> LocationResult<CreatedAisle> {
        self.builder.handle(cmd).await
    }

    pub async fn create_bin(&self, cmd: CreateBinCommand) -> LocationResult<LocationNode> {
        self.builder.handle(cmd).await
    }

    pub async fn preview_code(&self, query: PreviewCodeQuery) -> LocationResult<String> {
        self.builder
            .preview_code(query.parent_id.as_ref(), &query.label)
            .await
    }

    // ========== 节点维护 ==========

    pub async fn get_location(&self, query: GetLocationQuery) -> LocationResult<LocationNode> {
        self.catalog.handle(query).await
    }

    pub async fn list_locations(
        &self,
        query: ListLocationsQuery,
    ) -> LocationResult<Vec<LocationNode>> {
        self.catalog.handle(query).await
    }

    pub async fn set_location_active(
        &self,
        cmd: SetLocationActiveCommand,
    ) -> LocationResult<LocationNode> {
        self.maintenance.handle(cmd).await
    }

    pub async fn update_location_description(
        &self,
        cmd: UpdateLocationDescriptionCommand,
    ) -> LocationResult<LocationNode> {
        self.maintenance.handle(cmd).await
    }

    // ========== 布局 ==========

    pub async fn save_layout(&self, cmd: SaveLayoutCommand) -> LocationResult<WarehouseLayout> {
        self.maintenance.handle(cmd).await
    }

    pub async fn get_layout(&self, query: GetLayoutQuery) -> LocationResult<WarehouseLayout> {
        self.catalog.handle(query).await
    }

    pub async fn generate_locations_from_layout(
        &self,
        cmd: GenerateLocationsCommand,
    ) -> LocationResult<CompileReport> {
        self.compiler.handle(cmd).await
    }

    // ========== 级联选择 ==========

    pub async fn list_lots(&self, query: ListLotsQuery) -> Vec<String> {
        self.resolver.handle(query).await
    }

    pub async fn list_carts(&self, query: ListCartsQuery) -> Vec<String> {
        self.resolver.handle(query).await
    }

    pub async fn list_levels(&self, query: ListLevelsQuery) -> Vec<LevelOption> {
        self.resolver.handle(query).await
    }

    // ========== 树形展示 ==========

    pub async fn get_location_tree(
        &self,
        query: GetLocationTreeQuery,
    ) -> LocationResult<Vec<TreeNode>> {
        self.catalog.handle(query).await
    }
}
