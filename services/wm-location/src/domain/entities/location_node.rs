//! 库位节点实体

use common::{AuditInfo, OperatorId};
use domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    LocationDepth, LocationId, LocationLabel, WarehouseId, check_zone_label, child_path,
    zone_code,
};
use crate::error::{LocationError, LocationResult};

/// 待插入的库位
///
/// 只携带调用方可决定的部分，路径、编码与坐标由 [`LocationNode::derive`] 计算
#[derive(Debug, Clone)]
pub struct NewLocation {
    warehouse_id: WarehouseId,
    parent_id: Option<LocationId>,
    depth: LocationDepth,
    label: LocationLabel,
    description: Option<String>,
    operator: Option<OperatorId>,
}

impl NewLocation {
    pub fn zone(warehouse_id: WarehouseId, label: LocationLabel) -> Self {
        Self {
            warehouse_id,
            parent_id: None,
            depth: LocationDepth::Zone,
            label,
            description: None,
            operator: None,
        }
    }

    pub fn aisle(warehouse_id: WarehouseId, zone_id: LocationId, label: LocationLabel) -> Self {
        Self {
            warehouse_id,
            parent_id: Some(zone_id),
            depth: LocationDepth::Aisle,
            label,
            description: None,
            operator: None,
        }
    }

    pub fn bin(warehouse_id: WarehouseId, aisle_id: LocationId, label: LocationLabel) -> Self {
        Self {
            warehouse_id,
            parent_id: Some(aisle_id),
            depth: LocationDepth::Bin,
            label,
            description: None,
            operator: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = normalize_description(description);
        self
    }

    pub fn by(mut self, operator: Option<OperatorId>) -> Self {
        self.operator = operator;
        self
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    pub fn parent_id(&self) -> Option<&LocationId> {
        self.parent_id.as_ref()
    }

    pub fn depth(&self) -> LocationDepth {
        self.depth
    }

    pub fn label(&self) -> &LocationLabel {
        &self.label
    }
}

/// 仓库库位树上的节点（区、巷道或货位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    id: LocationId,
    warehouse_id: WarehouseId,
    parent_id: Option<LocationId>,
    depth: LocationDepth,
    code: String,
    path: String,
    zone: LocationLabel,
    aisle: Option<LocationLabel>,
    bin_code: Option<LocationLabel>,
    is_active: bool,
    description: Option<String>,
    audit_info: AuditInfo,
}

impl LocationNode {
    /// 由候选节点和父节点推导出完整节点
    ///
    /// 所有仓储实现的插入路径都经过这里，坐标从父节点向下复制，
    /// 只有本层坐标来自候选标签。唯一性由仓储负责。
    pub fn derive(candidate: &NewLocation, parent: Option<&LocationNode>) -> LocationResult<Self> {
        let (code, path, zone, aisle, bin_code) = match (candidate.depth.parent(), parent) {
            (None, _) => {
                check_zone_label(&candidate.label)?;
                let zone = candidate.label.clone();
                (zone_code(&zone), zone.to_string(), zone, None, None)
            }
            (Some(_), None) => {
                // 仓储未找到父节点
                let missing = candidate.parent_id.unwrap_or_default();
                return Err(LocationError::ParentNotFound(missing));
            }
            (Some(expected), Some(parent)) => {
                if Some(&parent.id) != candidate.parent_id.as_ref()
                    || parent.warehouse_id != candidate.warehouse_id
                {
                    return Err(LocationError::ParentNotFound(
                        candidate.parent_id.unwrap_or(parent.id),
                    ));
                }
                if parent.depth != expected {
                    return Err(LocationError::DepthMismatch {
                        expected,
                        found: parent.depth,
                    });
                }
                if !parent.is_active {
                    return Err(LocationError::InactiveParent(parent.id));
                }

                let path = child_path(&parent.path, &candidate.label);
                let (aisle, bin_code) = match candidate.depth {
                    LocationDepth::Aisle => (Some(candidate.label.clone()), None),
                    _ => (parent.aisle.clone(), Some(candidate.label.clone())),
                };
                (path.clone(), path, parent.zone.clone(), aisle, bin_code)
            }
        };

        Ok(Self {
            id: LocationId::new(),
            warehouse_id: candidate.warehouse_id,
            parent_id: candidate.parent_id,
            depth: candidate.depth,
            code,
            path,
            zone,
            aisle,
            bin_code,
            is_active: true,
            description: candidate.description.clone(),
            audit_info: AuditInfo::new(candidate.operator.clone()),
        })
    }

    /// 从持久化数据重建
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: LocationId,
        warehouse_id: WarehouseId,
        parent_id: Option<LocationId>,
        depth: LocationDepth,
        code: String,
        path: String,
        zone: LocationLabel,
        aisle: Option<LocationLabel>,
        bin_code: Option<LocationLabel>,
        is_active: bool,
        description: Option<String>,
        audit_info: AuditInfo,
    ) -> Self {
        Self {
            id,
            warehouse_id,
            parent_id,
            depth,
            code,
            path,
            zone,
            aisle,
            bin_code,
            is_active,
            description,
            audit_info,
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &LocationId {
        &self.id
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    pub fn parent_id(&self) -> Option<&LocationId> {
        self.parent_id.as_ref()
    }

    pub fn depth(&self) -> LocationDepth {
        self.depth
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn zone(&self) -> &LocationLabel {
        &self.zone
    }

    pub fn aisle(&self) -> Option<&LocationLabel> {
        self.aisle.as_ref()
    }

    pub fn bin_code(&self) -> Option<&LocationLabel> {
        self.bin_code.as_ref()
    }

    /// 本层坐标
    pub fn label(&self) -> &LocationLabel {
        match self.depth {
            LocationDepth::Zone => &self.zone,
            LocationDepth::Aisle => self.aisle.as_ref().unwrap_or(&self.zone),
            LocationDepth::Bin => self.bin_code.as_ref().unwrap_or(&self.zone),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.depth == LocationDepth::Bin
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    // ========== Mutations ==========

    /// 切换启用状态，返回是否发生变化
    pub fn set_active(&mut self, active: bool, operator: Option<OperatorId>) -> bool {
        if self.is_active == active {
            return false;
        }
        self.is_active = active;
        self.touch(operator);
        true
    }

    pub fn update_description(&mut self, description: Option<String>, operator: Option<OperatorId>) {
        self.description = normalize_description(description);
        self.touch(operator);
    }
}

impl Entity for LocationNode {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for LocationNode {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
