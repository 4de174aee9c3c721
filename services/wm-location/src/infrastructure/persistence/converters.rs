//! 数据库行到领域对象的转换

use common::{AuditInfo, OperatorId};
use errors::AppError;
use uuid::Uuid;

use crate::domain::entities::{LocationNode, WarehouseLayout};
use crate::domain::value_objects::{
    LevelOption, LocationDepth, LocationId, LocationLabel, WarehouseId,
};
use crate::error::LocationResult;

use super::rows::{LayoutRow, LevelRow, LocationRow};

fn stored_label(raw: &str, column: &str, id: Uuid) -> LocationResult<LocationLabel> {
    LocationLabel::parse(raw).map_err(|e| {
        AppError::internal(format!("库位 {} 的 {} 列数据损坏: {}", id, column, e)).into()
    })
}

/// 将 LocationRow 转换为 LocationNode
pub fn location_from_row(row: LocationRow) -> LocationResult<LocationNode> {
    let depth = LocationDepth::from_i16(row.depth).ok_or_else(|| {
        AppError::internal(format!("库位 {} 的 depth 非法: {}", row.id, row.depth))
    })?;
    let zone = stored_label(&row.zone, "zone", row.id)?;
    let aisle = row
        .aisle
        .as_deref()
        .map(|a| stored_label(a, "aisle", row.id))
        .transpose()?;
    let bin_code = row
        .bin_code
        .as_deref()
        .map(|b| stored_label(b, "bin_code", row.id))
        .transpose()?;

    let audit_info = build_audit_info(
        row.created_at,
        row.created_by,
        row.updated_at,
        row.updated_by,
    );

    Ok(LocationNode::from_parts(
        LocationId::from_uuid(row.id),
        WarehouseId::from_uuid(row.warehouse_id),
        row.parent_id.map(LocationId::from_uuid),
        depth,
        row.code,
        row.path,
        zone,
        aisle,
        bin_code,
        row.is_active,
        row.description,
        audit_info,
    ))
}

pub fn level_from_row(row: LevelRow) -> LevelOption {
    LevelOption {
        id: LocationId::from_uuid(row.id),
        code: row.code,
        level: row.bin_code,
    }
}

pub fn layout_from_row(row: LayoutRow) -> WarehouseLayout {
    WarehouseLayout {
        warehouse_id: WarehouseId::from_uuid(row.warehouse_id),
        name: row.name,
        version: row.version,
        rects: row.rects.0,
    }
}

fn build_audit_info(
    created_at: chrono::DateTime<chrono::Utc>,
    created_by: Option<Uuid>,
    updated_at: chrono::DateTime<chrono::Utc>,
    updated_by: Option<Uuid>,
) -> AuditInfo {
    AuditInfo {
        created_at,
        created_by: created_by.map(OperatorId::from_uuid),
        updated_at,
        updated_by: updated_by.map(OperatorId::from_uuid),
    }
}
