//! 库位仓储接口

use async_trait::async_trait;
use common::OperatorId;

use crate::domain::entities::{LocationNode, NewLocation};
use crate::domain::value_objects::{LevelOption, LocationDepth, LocationId, WarehouseId};
use crate::error::LocationResult;

/// 列表过滤条件，所有条件取交集
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFilter {
    pub depth: Option<LocationDepth>,
    pub parent_id: Option<LocationId>,
    pub zone: Option<String>,
    pub aisle: Option<String>,
    pub is_active: Option<bool>,
}

impl LocationFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: LocationDepth) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn parent(mut self, parent_id: LocationId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn zone(mut self, zone: impl AsRef<str>) -> Self {
        self.zone = Some(common::utils::normalize_label(zone.as_ref()));
        self
    }

    pub fn aisle(mut self, aisle: impl AsRef<str>) -> Self {
        self.aisle = Some(common::utils::normalize_label(aisle.as_ref()));
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// 节点自身字段是否满足条件
    pub fn matches(&self, node: &LocationNode) -> bool {
        self.depth.is_none_or(|d| node.depth() == d)
            && self
                .parent_id
                .as_ref()
                .is_none_or(|p| node.parent_id() == Some(p))
            && self
                .zone
                .as_deref()
                .is_none_or(|z| node.zone().as_str() == z)
            && self
                .aisle
                .as_deref()
                .is_none_or(|a| node.aisle().map(|x| x.as_str()) == Some(a))
            && self.is_active.is_none_or(|active| node.is_active() == active)
    }
}

/// 库位仓储接口
///
/// `insert_node` 必须在一次原子操作内完成父节点校验、
/// [`LocationNode::derive`] 推导和 `(warehouse_id, code)` 唯一性检查
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// 按 path 排序列出仓库节点
    async fn list_nodes(
        &self,
        warehouse_id: &WarehouseId,
        filter: &LocationFilter,
    ) -> LocationResult<Vec<LocationNode>>;

    async fn get_node(&self, id: &LocationId) -> LocationResult<Option<LocationNode>>;

    async fn find_by_code(
        &self,
        warehouse_id: &WarehouseId,
        code: &str,
    ) -> LocationResult<Option<LocationNode>>;

    async fn insert_node(&self, candidate: NewLocation) -> LocationResult<LocationNode>;

    async fn set_active(
        &self,
        id: &LocationId,
        is_active: bool,
        operator: Option<OperatorId>,
    ) -> LocationResult<LocationNode>;

    async fn update_description(
        &self,
        id: &LocationId,
        description: Option<String>,
        operator: Option<OperatorId>,
    ) -> LocationResult<LocationNode>;

    /// 有效启用的区标签，去重排序
    async fn list_lots(&self, warehouse_id: &WarehouseId) -> LocationResult<Vec<String>>;

    /// 指定区下有效启用的巷道标签，去重排序
    async fn list_carts(&self, warehouse_id: &WarehouseId, lot: &str)
    -> LocationResult<Vec<String>>;

    /// 指定区、巷道下有效启用的货位，按编码排序
    async fn list_levels(
        &self,
        warehouse_id: &WarehouseId,
        lot: &str,
        cart: &str,
    ) -> LocationResult<Vec<LevelOption>>;
}
