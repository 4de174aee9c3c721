//! Proto 与领域对象的转换

use chrono::{DateTime, Utc};
use common::OperatorId;
use domain_core::AggregateRoot;
use tonic::Status;
use tonic::metadata::MetadataMap;
use uuid::Uuid;

use crate::application::{CompileReport, SkippedRect, TreeNode, count_nodes, render_tree};
use crate::domain::entities::{LayoutRect, LocationNode, RectKind, WarehouseLayout};
use crate::domain::value_objects::{LevelOption, LocationDepth, LocationId, WarehouseId};
use crate::proto;

/// 审计用操作员 ID 的 metadata 键
pub const OPERATOR_HEADER: &str = "x-operator-id";

// 从 gRPC metadata 中提取操作员，缺省时为 None
pub fn extract_operator(metadata: &MetadataMap) -> Result<Option<OperatorId>, Status> {
    let Some(value) = metadata.get(OPERATOR_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| Status::invalid_argument("Invalid operator ID format"))?;
    OperatorId::from_string(raw.trim())
        .map(Some)
        .map_err(|_| Status::invalid_argument("Invalid operator ID UUID"))
}

fn parse_uuid(s: &str, field_name: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(s.trim())
        .map_err(|_| Status::invalid_argument(format!("Invalid {} UUID", field_name)))
}

pub fn parse_location_id(s: &str, field_name: &str) -> Result<LocationId, Status> {
    parse_uuid(s, field_name).map(LocationId::from_uuid)
}

pub fn parse_warehouse_id(s: &str) -> Result<WarehouseId, Status> {
    parse_uuid(s, "warehouse ID").map(WarehouseId::from_uuid)
}

/// 空白字符串视为未提供
pub fn parse_optional_location_id(
    s: Option<&str>,
    field_name: &str,
) -> Result<Option<LocationId>, Status> {
    match s.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_location_id(s, field_name).map(Some),
        None => Ok(None),
    }
}

/// 空白字符串视为未提供
pub fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

// ========== 枚举 ==========

pub fn depth_to_proto(depth: LocationDepth) -> proto::LocationDepth {
    match depth {
        LocationDepth::Zone => proto::LocationDepth::Zone,
        LocationDepth::Aisle => proto::LocationDepth::Aisle,
        LocationDepth::Bin => proto::LocationDepth::Bin,
    }
}

/// `UNSPECIFIED` 表示不按深度过滤
pub fn depth_from_proto(value: i32) -> Result<Option<LocationDepth>, Status> {
    match proto::LocationDepth::try_from(value) {
        Ok(proto::LocationDepth::Unspecified) => Ok(None),
        Ok(proto::LocationDepth::Zone) => Ok(Some(LocationDepth::Zone)),
        Ok(proto::LocationDepth::Aisle) => Ok(Some(LocationDepth::Aisle)),
        Ok(proto::LocationDepth::Bin) => Ok(Some(LocationDepth::Bin)),
        Err(_) => Err(Status::invalid_argument(format!(
            "Unknown location depth {}",
            value
        ))),
    }
}

pub fn rect_kind_to_proto(kind: RectKind) -> proto::RectType {
    match kind {
        RectKind::Zone => proto::RectType::Zone,
        RectKind::Aisle => proto::RectType::Aisle,
        RectKind::Bin => proto::RectType::Bin,
        RectKind::Dock => proto::RectType::Dock,
        RectKind::Office => proto::RectType::Office,
    }
}

pub fn rect_kind_from_proto(value: i32) -> Result<RectKind, Status> {
    match proto::RectType::try_from(value) {
        Ok(proto::RectType::Zone) => Ok(RectKind::Zone),
        Ok(proto::RectType::Aisle) => Ok(RectKind::Aisle),
        Ok(proto::RectType::Bin) => Ok(RectKind::Bin),
        Ok(proto::RectType::Dock) => Ok(RectKind::Dock),
        Ok(proto::RectType::Office) => Ok(RectKind::Office),
        Ok(proto::RectType::Unspecified) | Err(_) => Err(Status::invalid_argument(format!(
            "Unknown rectangle type {}",
            value
        ))),
    }
}

// ========== 消息 ==========

pub fn to_timestamp(dt: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

pub fn location_to_proto(node: &LocationNode) -> proto::Location {
    let audit = node.audit_info();
    proto::Location {
        id: node.id().to_string(),
        warehouse_id: node.warehouse_id().to_string(),
        parent_id: node.parent_id().map(|p| p.to_string()),
        depth: depth_to_proto(node.depth()) as i32,
        code: node.code().to_string(),
        path: node.path().to_string(),
        zone: node.zone().to_string(),
        aisle: node.aisle().map(|a| a.to_string()),
        bin_code: node.bin_code().map(|b| b.to_string()),
        is_active: node.is_active(),
        description: node.description().map(str::to_string),
        created_at: Some(to_timestamp(audit.created_at)),
        updated_at: Some(to_timestamp(audit.updated_at)),
    }
}

pub fn rect_from_proto(rect: proto::LayoutRect) -> Result<LayoutRect, Status> {
    let kind = rect_kind_from_proto(rect.kind)?;
    let mut domain = LayoutRect::new(
        rect.id,
        kind,
        rect.name,
        (rect.x, rect.y, rect.width, rect.height),
    );
    domain.parent_id = non_blank(rect.parent_id);
    Ok(domain)
}

pub fn rect_to_proto(rect: &LayoutRect) -> proto::LayoutRect {
    proto::LayoutRect {
        id: rect.id.clone(),
        kind: rect_kind_to_proto(rect.kind) as i32,
        name: rect.name.clone(),
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        parent_id: rect.parent_id.clone(),
    }
}

pub fn layout_to_proto(layout: &WarehouseLayout) -> proto::WarehouseLayout {
    proto::WarehouseLayout {
        warehouse_id: layout.warehouse_id.to_string(),
        name: layout.name.clone(),
        version: layout.version,
        rects: layout.rects.iter().map(rect_to_proto).collect(),
    }
}

fn skipped_to_proto(skipped: &SkippedRect) -> proto::SkippedRect {
    proto::SkippedRect {
        rect_id: skipped.rect_id.clone(),
        kind: rect_kind_to_proto(skipped.kind) as i32,
        reason: skipped.reason.to_string(),
    }
}

pub fn report_to_proto(report: &CompileReport) -> proto::GenerateLocationsFromLayoutResponse {
    proto::GenerateLocationsFromLayoutResponse {
        zones_created: report.zones_created,
        aisles_created: report.aisles_created,
        bins_created: report.bins_created,
        skipped: report.skipped.iter().map(skipped_to_proto).collect(),
    }
}

pub fn level_to_proto(level: LevelOption) -> proto::LevelOption {
    proto::LevelOption {
        id: level.id.to_string(),
        code: level.code,
        level: level.level,
    }
}

fn tree_node_to_proto(tree: &TreeNode) -> proto::TreeNode {
    proto::TreeNode {
        location: Some(location_to_proto(&tree.node)),
        children: tree.children.iter().map(tree_node_to_proto).collect(),
    }
}

pub fn tree_to_proto(forest: &[TreeNode]) -> proto::GetLocationTreeResponse {
    proto::GetLocationTreeResponse {
        roots: forest.iter().map(tree_node_to_proto).collect(),
        node_count: count_nodes(forest) as u32,
        rendered: render_tree(forest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::build_tree;
    use crate::domain::entities::NewLocation;
    use crate::domain::value_objects::LocationLabel;

    #[test]
    fn test_extract_operator() {
        let mut metadata = MetadataMap::new();
        assert_eq!(extract_operator(&metadata).unwrap(), None);

        let id = Uuid::now_v7();
        metadata.insert(OPERATOR_HEADER, id.to_string().parse().unwrap());
        assert_eq!(
            extract_operator(&metadata).unwrap(),
            Some(OperatorId::from_uuid(id))
        );

        metadata.insert(OPERATOR_HEADER, "not-a-uuid".parse().unwrap());
        assert_eq!(
            extract_operator(&metadata).unwrap_err().code(),
            tonic::Code::InvalidArgument
        );
    }

    #[test]
    fn test_parse_optional_location_id() {
        assert_eq!(parse_optional_location_id(None, "parent ID").unwrap(), None);
        assert_eq!(parse_optional_location_id(Some("  "), "parent ID").unwrap(), None);
        assert!(parse_optional_location_id(Some("zz"), "parent ID").is_err());
    }

    #[test]
    fn test_enum_mapping() {
        assert_eq!(depth_from_proto(0).unwrap(), None);
        assert_eq!(
            depth_from_proto(proto::LocationDepth::Bin as i32).unwrap(),
            Some(LocationDepth::Bin)
        );
        assert!(depth_from_proto(42).is_err());

        assert_eq!(
            rect_kind_from_proto(proto::RectType::Dock as i32).unwrap(),
            RectKind::Dock
        );
        assert!(rect_kind_from_proto(0).is_err());
    }

    #[test]
    fn test_tree_response() {
        let wh = WarehouseId::new();
        let zone = LocationNode::derive(
            &NewLocation::zone(wh, LocationLabel::parse("a").unwrap()),
            None,
        )
        .unwrap();
        let response = tree_to_proto(&build_tree(vec![zone]));

        assert_eq!(response.node_count, 1);
        assert_eq!(response.rendered, "ZONE-A (zone)\n");
        let root = response.roots[0].location.as_ref().unwrap();
        assert_eq!(root.code, "ZONE-A");
        assert_eq!(root.depth, proto::LocationDepth::Zone as i32);
        assert_eq!(root.parent_id, None);
    }
}
