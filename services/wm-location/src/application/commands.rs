//! 命令定义

use common::OperatorId;
use cqrs_core::Command;

use crate::domain::entities::{LayoutRect, LocationNode, WarehouseLayout};
use crate::domain::value_objects::{LocationId, WarehouseId};

use super::compiler::CompileReport;

/// 单个巷道允许预建的最大层数
pub const MAX_LEVEL_COUNT: u32 = 99;

/// 创建区
#[derive(Debug, Clone)]
pub struct CreateZoneCommand {
    pub warehouse_id: WarehouseId,
    pub label: String,
    pub description: Option<String>,
    /// 操作员确认过的编码
    pub expected_code: Option<String>,
    pub operator: Option<OperatorId>,
}

impl Command for CreateZoneCommand {
    type Result = LocationNode;
}

/// 创建巷道，可选按层数批量预建货位 `L1..Ln`
#[derive(Debug, Clone)]
pub struct CreateAisleCommand {
    pub zone_id: LocationId,
    pub label: String,
    pub level_count: u32,
    pub prepopulate_levels: bool,
    pub description: Option<String>,
    pub expected_code: Option<String>,
    pub operator: Option<OperatorId>,
}

/// 巷道及其预建货位
#[derive(Debug, Clone)]
pub struct CreatedAisle {
    pub aisle: LocationNode,
    pub levels: Vec<LocationNode>,
}

impl Command for CreateAisleCommand {
    type Result = CreatedAisle;
}

/// 创建货位
#[derive(Debug, Clone)]
pub struct CreateBinCommand {
    pub aisle_id: LocationId,
    pub label: String,
    pub description: Option<String>,
    pub expected_code: Option<String>,
    pub operator: Option<OperatorId>,
}

impl Command for CreateBinCommand {
    type Result = LocationNode;
}

/// 启用或停用库位
#[derive(Debug, Clone)]
pub struct SetLocationActiveCommand {
    pub location_id: LocationId,
    pub is_active: bool,
    pub operator: Option<OperatorId>,
}

impl Command for SetLocationActiveCommand {
    type Result = LocationNode;
}

/// 修改库位描述，`None` 表示清空
#[derive(Debug, Clone)]
pub struct UpdateLocationDescriptionCommand {
    pub location_id: LocationId,
    pub description: Option<String>,
    pub operator: Option<OperatorId>,
}

impl Command for UpdateLocationDescriptionCommand {
    type Result = LocationNode;
}

/// 保存仓库布局
#[derive(Debug, Clone)]
pub struct SaveLayoutCommand {
    pub warehouse_id: WarehouseId,
    pub name: String,
    pub rects: Vec<LayoutRect>,
    pub operator: Option<OperatorId>,
}

impl Command for SaveLayoutCommand {
    type Result = WarehouseLayout;
}

/// 从当前布局生成库位
#[derive(Debug, Clone)]
pub struct GenerateLocationsCommand {
    pub warehouse_id: WarehouseId,
    pub operator: Option<OperatorId>,
}

impl Command for GenerateLocationsCommand {
    type Result = CompileReport;
}
