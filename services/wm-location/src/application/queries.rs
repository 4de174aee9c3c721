//! 查询定义

use cqrs_core::Query;

use crate::domain::entities::{LocationNode, WarehouseLayout};
use crate::domain::repositories::LocationFilter;
use crate::domain::value_objects::{LevelOption, LocationId, WarehouseId};

use super::tree::TreeNode;

#[derive(Debug, Clone)]
pub struct GetLocationQuery {
    pub location_id: LocationId,
}

impl Query for GetLocationQuery {
    type Result = LocationNode;
}

#[derive(Debug, Clone)]
pub struct ListLocationsQuery {
    pub warehouse_id: WarehouseId,
    pub filter: LocationFilter,
}

impl Query for ListLocationsQuery {
    type Result = Vec<LocationNode>;
}

/// 预览编码；`parent_id` 为空时预览区编码
#[derive(Debug, Clone)]
pub struct PreviewCodeQuery {
    pub parent_id: Option<LocationId>,
    pub label: String,
}

impl Query for PreviewCodeQuery {
    type Result = String;
}

#[derive(Debug, Clone)]
pub struct GetLayoutQuery {
    pub warehouse_id: WarehouseId,
}

impl Query for GetLayoutQuery {
    type Result = WarehouseLayout;
}

#[derive(Debug, Clone)]
pub struct GetLocationTreeQuery {
    pub warehouse_id: WarehouseId,
    pub include_inactive: bool,
}

impl Query for GetLocationTreeQuery {
    type Result = Vec<TreeNode>;
}

// ========== 级联选择 ==========

#[derive(Debug, Clone)]
pub struct ListLotsQuery {
    pub warehouse_id: WarehouseId,
}

impl Query for ListLotsQuery {
    type Result = Vec<String>;
}

#[derive(Debug, Clone)]
pub struct ListCartsQuery {
    pub warehouse_id: WarehouseId,
    pub lot: String,
}

impl Query for ListCartsQuery {
    type Result = Vec<String>;
}

#[derive(Debug, Clone)]
pub struct ListLevelsQuery {
    pub warehouse_id: WarehouseId,
    pub lot: String,
    pub cart: String,
}

impl Query for ListLevelsQuery {
    type Result = Vec<LevelOption>;
}
