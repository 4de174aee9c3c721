//! 手工层级构建
//!
//! 区、巷道、货位三个引导式构造器。编码在客户端预览并经操作员确认，
//! 服务端从权威父节点重新推导，二者不一致时拒绝写入。

use std::sync::Arc;

use async_trait::async_trait;
use cqrs_core::CommandHandler;
use tracing::{debug, info};

use crate::domain::entities::{LocationNode, NewLocation};
use crate::domain::repositories::LocationRepository;
use crate::domain::value_objects::{
    LocationDepth, LocationId, LocationLabel, check_zone_label, child_path, preview_child_code,
    preview_zone_code, zone_code,
};
use crate::error::{LocationError, LocationResult};

use super::commands::{
    CreateAisleCommand, CreateBinCommand, CreateZoneCommand, CreatedAisle, MAX_LEVEL_COUNT,
};
use super::metrics::record_node_created;

pub struct HierarchyBuilder {
    repo: Arc<dyn LocationRepository>,
}

impl HierarchyBuilder {
    pub fn new(repo: Arc<dyn LocationRepository>) -> Self {
        Self { repo }
    }

    /// 预览编码，`parent_id` 为空时为区编码
    pub async fn preview_code(
        &self,
        parent_id: Option<&LocationId>,
        raw_label: &str,
    ) -> LocationResult<String> {
        let Some(id) = parent_id else {
            return Ok(preview_zone_code(raw_label)?);
        };
        let parent = self
            .repo
            .get_node(id)
            .await?
            .ok_or(LocationError::ParentNotFound(*id))?;
        if parent.depth().child().is_none() {
            return Err(LocationError::InvalidArgument(format!(
                "bin {} cannot have children",
                parent.code()
            )));
        }
        Ok(preview_child_code(parent.path(), raw_label)?)
    }

    /// 读取并校验父节点深度
    async fn load_parent(
        &self,
        id: &LocationId,
        expected: LocationDepth,
    ) -> LocationResult<LocationNode> {
        let parent = self
            .repo
            .get_node(id)
            .await?
            .ok_or(LocationError::ParentNotFound(*id))?;
        if parent.depth() != expected {
            return Err(LocationError::DepthMismatch {
                expected,
                found: parent.depth(),
            });
        }
        Ok(parent)
    }

    async fn insert(&self, candidate: NewLocation) -> LocationResult<LocationNode> {
        let node = self.repo.insert_node(candidate).await?;
        record_node_created(node.depth());
        info!(
            warehouse_id = %node.warehouse_id(),
            location_id = %node.id(),
            code = %node.code(),
            depth = %node.depth(),
            "Location created"
        );
        Ok(node)
    }

    async fn insert_bin(
        &self,
        aisle: &LocationNode,
        label: LocationLabel,
        description: Option<String>,
        operator: Option<common::OperatorId>,
    ) -> LocationResult<LocationNode> {
        let candidate = NewLocation::bin(*aisle.warehouse_id(), *aisle.id(), label)
            .with_description(description)
            .by(operator);
        self.insert(candidate).await
    }
}

/// 操作员确认的编码必须与服务端推导一致
fn confirm_code(expected: Option<&str>, derived: &str) -> LocationResult<()> {
    match expected.map(common::utils::normalize_label) {
        Some(expected) if expected != derived => Err(LocationError::CodeMismatch {
            expected,
            derived: derived.to_string(),
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl CommandHandler<CreateZoneCommand> for HierarchyBuilder {
    type Error = LocationError;

    async fn handle(&self, command: CreateZoneCommand) -> LocationResult<LocationNode> {
        let label = LocationLabel::parse(&command.label)?;
        check_zone_label(&label)?;
        confirm_code(command.expected_code.as_deref(), &zone_code(&label))?;

        let candidate = NewLocation::zone(command.warehouse_id, label)
            .with_description(command.description)
            .by(command.operator);
        self.insert(candidate).await
    }
}

#[async_trait]
impl CommandHandler<CreateAisleCommand> for HierarchyBuilder {
    type Error = LocationError;

    async fn handle(&self, command: CreateAisleCommand) -> LocationResult<CreatedAisle> {
        if command.level_count == 0 || command.level_count > MAX_LEVEL_COUNT {
            return Err(LocationError::InvalidArgument(format!(
                "level_count must be between 1 and {}",
                MAX_LEVEL_COUNT
            )));
        }
        let label = LocationLabel::parse(&command.label)?;
        let zone = self
            .load_parent(&command.zone_id, LocationDepth::Zone)
            .await?;
        confirm_code(
            command.expected_code.as_deref(),
            &child_path(zone.path(), &label),
        )?;

        let candidate = NewLocation::aisle(*zone.warehouse_id(), *zone.id(), label)
            .with_description(command.description)
            .by(command.operator.clone());
        let aisle = self.insert(candidate).await?;

        let mut levels = Vec::new();
        if command.prepopulate_levels && command.level_count > 1 {
            for n in 1..=command.level_count {
                let level = LocationLabel::parse(&format!("L{}", n))?;
                let bin = self
                    .insert_bin(&aisle, level, None, command.operator.clone())
                    .await?;
                levels.push(bin);
            }
            debug!(
                aisle = %aisle.code(),
                levels = levels.len(),
                "Aisle levels pre-populated"
            );
        }

        Ok(CreatedAisle { aisle, levels })
    }
}

#[async_trait]
impl CommandHandler<CreateBinCommand> for HierarchyBuilder {
    type Error = LocationError;

    async fn handle(&self, command: CreateBinCommand) -> LocationResult<LocationNode> {
        let label = LocationLabel::parse(&command.label)?;
        let aisle = self
            .load_parent(&command.aisle_id, LocationDepth::Aisle)
            .await?;
        confirm_code(
            command.expected_code.as_deref(),
            &child_path(aisle.path(), &label),
        )?;

        self.insert_bin(&aisle, label, command.description, command.operator)
            .await
    }
}
