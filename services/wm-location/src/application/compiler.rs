//! 布局到层级的编译
//!
//! 以轴对齐包围盒包含关系把布局矩形映射为区 → 巷道 → 货位。
//! 无法归属的矩形不算错误，逐个记录在报告里。

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use common::OperatorId;
use cqrs_core::CommandHandler;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::entities::{LayoutRect, LocationNode, NewLocation, RectKind, WarehouseLayout};
use crate::domain::repositories::{LayoutRepository, LocationRepository};
use crate::domain::value_objects::{
    LocationLabel, WarehouseId, ZONE_CODE_PREFIX, check_zone_label, strip_label_prefix,
};
use crate::error::{LocationError, LocationResult};

use super::commands::GenerateLocationsCommand;
use super::metrics::{record_node_created, record_rect_skipped};

/// 矩形未生成节点的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 巷道不在任何区矩形内
    NoContainingZone,
    /// 货位不在任何巷道矩形内
    NoContainingAisle,
    /// 包含它的矩形自身未生成节点
    ParentNotRealized,
    /// 编码已存在，沿用已有节点
    AlreadyExists,
    /// 名称无法作为库位标签
    InvalidLabel,
    /// 仓储拒绝插入，例如父节点已停用
    Rejected,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoContainingZone => "no_containing_zone",
            Self::NoContainingAisle => "no_containing_aisle",
            Self::ParentNotRealized => "parent_not_realized",
            Self::AlreadyExists => "already_exists",
            Self::InvalidLabel => "invalid_label",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRect {
    pub rect_id: String,
    pub kind: RectKind,
    pub reason: SkipReason,
}

/// 编译结果；部分矩形被跳过仍视为成功
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub zones_created: u32,
    pub aisles_created: u32,
    pub bins_created: u32,
    pub skipped: Vec<SkippedRect>,
}

impl CompileReport {
    pub fn total_created(&self) -> u32 {
        self.zones_created + self.aisles_created + self.bins_created
    }

    pub fn skipped_with(&self, reason: SkipReason) -> impl Iterator<Item = &SkippedRect> {
        self.skipped.iter().filter(move |s| s.reason == reason)
    }

    fn skip(&mut self, rect: &LayoutRect, reason: SkipReason) {
        record_rect_skipped(reason);
        debug!(rect_id = %rect.id, kind = %rect.kind, %reason, "Layout rectangle skipped");
        self.skipped.push(SkippedRect {
            rect_id: rect.id.clone(),
            kind: rect.kind,
            reason,
        });
    }

    fn created(&mut self, kind: RectKind) {
        match kind {
            RectKind::Zone => self.zones_created += 1,
            RectKind::Aisle => self.aisles_created += 1,
            RectKind::Bin => self.bins_created += 1,
            RectKind::Dock | RectKind::Office => {}
        }
    }
}

/// 单个矩形的插入结果
enum Placement {
    Created(LocationNode),
    Existing(LocationNode),
    Skipped(SkipReason),
}

pub struct LayoutCompiler {
    locations: Arc<dyn LocationRepository>,
    layouts: Arc<dyn LayoutRepository>,
}

impl LayoutCompiler {
    pub fn new(locations: Arc<dyn LocationRepository>, layouts: Arc<dyn LayoutRepository>) -> Self {
        Self { locations, layouts }
    }

    /// 读取仓库当前布局并编译
    pub async fn generate(
        &self,
        warehouse_id: &WarehouseId,
        operator: Option<OperatorId>,
    ) -> LocationResult<CompileReport> {
        let layout = self
            .layouts
            .find_current(warehouse_id)
            .await?
            .ok_or(LocationError::LayoutNotFound(*warehouse_id))?;
        self.compile(&layout, operator).await
    }

    /// 编译给定布局
    ///
    /// 插入逐个进行，不是端到端事务；重复编码视为跳过并沿用已有节点，
    /// 因此对未变化的布局重复编译不会产生新节点。存储故障会中止编译。
    pub async fn compile(
        &self,
        layout: &WarehouseLayout,
        operator: Option<OperatorId>,
    ) -> LocationResult<CompileReport> {
        let warehouse_id = layout.warehouse_id;
        let zones: Vec<&LayoutRect> = layout.rects_of(RectKind::Zone).collect();
        let aisles: Vec<&LayoutRect> = layout.rects_of(RectKind::Aisle).collect();
        let bins: Vec<&LayoutRect> = layout.rects_of(RectKind::Bin).collect();

        info!(
            %warehouse_id,
            version = layout.version,
            zones = zones.len(),
            aisles = aisles.len(),
            bins = bins.len(),
            "Compiling layout"
        );

        let mut report = CompileReport::default();
        let mut zone_nodes: HashMap<&str, LocationNode> = HashMap::new();
        let mut aisle_nodes: HashMap<&str, LocationNode> = HashMap::new();

        for rect in &zones {
            let label = child_label(&rect.name, &[ZONE_CODE_PREFIX])
                .filter(|label| check_zone_label(label).is_ok());
            let placement = match label {
                Some(label) => {
                    let candidate = NewLocation::zone(warehouse_id, label).by(operator.clone());
                    self.place(candidate).await?
                }
                None => Placement::Skipped(SkipReason::InvalidLabel),
            };
            if let Some(node) = settle(&mut report, rect, placement) {
                zone_nodes.insert(rect.id.as_str(), node);
            }
        }

        for rect in &aisles {
            let Some(zone_rect) = zones.iter().find(|z| z.contains(rect)) else {
                report.skip(rect, SkipReason::NoContainingZone);
                continue;
            };
            let Some(zone) = zone_nodes.get(zone_rect.id.as_str()) else {
                report.skip(rect, SkipReason::ParentNotRealized);
                continue;
            };

            let placement = match child_label(&rect.name, &[zone.zone().as_str()]) {
                Some(label) => {
                    let candidate = NewLocation::aisle(warehouse_id, *zone.id(), label)
                        .by(operator.clone());
                    self.place(candidate).await?
                }
                None => Placement::Skipped(SkipReason::InvalidLabel),
            };
            if let Some(node) = settle(&mut report, rect, placement) {
                aisle_nodes.insert(rect.id.as_str(), node);
            }
        }

        for rect in &bins {
            let Some(aisle_rect) = aisles.iter().find(|a| a.contains(rect)) else {
                report.skip(rect, SkipReason::NoContainingAisle);
                continue;
            };
            let Some(aisle) = aisle_nodes.get(aisle_rect.id.as_str()) else {
                report.skip(rect, SkipReason::ParentNotRealized);
                continue;
            };

            let aisle_label = aisle.label().as_str();
            let placement = match child_label(&rect.name, &[aisle.path(), aisle_label]) {
                Some(label) => {
                    let candidate =
                        NewLocation::bin(warehouse_id, *aisle.id(), label).by(operator.clone());
                    self.place(candidate).await?
                }
                None => Placement::Skipped(SkipReason::InvalidLabel),
            };
            settle(&mut report, rect, placement);
        }

        if report.skipped.is_empty() {
            info!(
                %warehouse_id,
                zones = report.zones_created,
                aisles = report.aisles_created,
                bins = report.bins_created,
                "Layout compiled"
            );
        } else {
            warn!(
                %warehouse_id,
                zones = report.zones_created,
                aisles = report.aisles_created,
                bins = report.bins_created,
                skipped = report.skipped.len(),
                "Layout compiled with skipped rectangles"
            );
        }
        Ok(report)
    }

    /// 插入一个节点；重复编码时查回已有节点
    ///
    /// 只有深度与父节点都一致的已有节点才会被沿用
    async fn place(&self, candidate: NewLocation) -> LocationResult<Placement> {
        let warehouse_id = *candidate.warehouse_id();
        let depth = candidate.depth();
        let parent_id = candidate.parent_id().copied();
        match self.locations.insert_node(candidate).await {
            Ok(node) => {
                record_node_created(depth);
                Ok(Placement::Created(node))
            }
            Err(LocationError::DuplicateCode { code, .. }) => {
                match self.locations.find_by_code(&warehouse_id, &code).await? {
                    Some(existing)
                        if existing.depth() == depth
                            && existing.parent_id() == parent_id.as_ref() =>
                    {
                        Ok(Placement::Existing(existing))
                    }
                    Some(existing) => {
                        warn!(
                            %code,
                            expected_depth = %depth,
                            found_depth = %existing.depth(),
                            "Layout node code taken by an unrelated location"
                        );
                        Ok(Placement::Skipped(SkipReason::Rejected))
                    }
                    None => Ok(Placement::Skipped(SkipReason::Rejected)),
                }
            }
            Err(LocationError::Storage(e)) => Err(LocationError::Storage(e)),
            Err(e) => {
                debug!(error = %e, tag = e.tag(), "Layout node rejected");
                Ok(Placement::Skipped(SkipReason::Rejected))
            }
        }
    }
}

/// 记录插入结果，返回可作为父节点的节点
fn settle(report: &mut CompileReport, rect: &LayoutRect, placement: Placement) -> Option<LocationNode> {
    match placement {
        Placement::Created(node) => {
            report.created(rect.kind);
            Some(node)
        }
        Placement::Existing(node) => {
            report.skip(rect, SkipReason::AlreadyExists);
            Some(node)
        }
        Placement::Skipped(reason) => {
            report.skip(rect, reason);
            None
        }
    }
}

/// 矩形名称转为子节点标签，按顺序去除第一个匹配的父级前缀
///
/// 例如巷道 `A1` 内的货位 `A1-L1` 得到 `L1`
fn child_label(name: &str, parent_prefixes: &[&str]) -> Option<LocationLabel> {
    let normalized = common::utils::normalize_label(name);
    let stripped = parent_prefixes
        .iter()
        .map(|prefix| strip_label_prefix(&normalized, prefix))
        .find(|s| s.len() != normalized.len())
        .unwrap_or(normalized.as_str());
    LocationLabel::parse(stripped).ok()
}

#[async_trait]
impl CommandHandler<GenerateLocationsCommand> for LayoutCompiler {
    type Error = LocationError;

    async fn handle(&self, command: GenerateLocationsCommand) -> LocationResult<CompileReport> {
        self.generate(&command.warehouse_id, command.operator).await
    }
}
