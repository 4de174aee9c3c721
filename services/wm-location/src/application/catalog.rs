//! 库位读取：单个节点、列表、树与布局

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cqrs_core::QueryHandler;
use tracing::debug;

use crate::domain::entities::{LocationNode, WarehouseLayout};
use crate::domain::value_objects::LocationId;
use crate::domain::repositories::{LayoutRepository, LocationFilter, LocationRepository};
use crate::error::{LocationError, LocationResult};

use super::queries::{GetLayoutQuery, GetLocationQuery, GetLocationTreeQuery, ListLocationsQuery};
use super::tree::{TreeNode, build_tree};

pub struct LocationCatalog {
    locations: Arc<dyn LocationRepository>,
    layouts: Arc<dyn LayoutRepository>,
}

impl LocationCatalog {
    pub fn new(locations: Arc<dyn LocationRepository>, layouts: Arc<dyn LayoutRepository>) -> Self {
        Self { locations, layouts }
    }
}

/// 保留自身及所有祖先都启用的节点
///
/// 只检查输入中存在的祖先
pub fn retain_effectively_active(nodes: Vec<LocationNode>) -> Vec<LocationNode> {
    let index: HashMap<LocationId, (bool, Option<LocationId>)> = nodes
        .iter()
        .map(|n| (*n.id(), (n.is_active(), n.parent_id().copied())))
        .collect();

    let effective = |node: &LocationNode| {
        let mut current = Some(*node.id());
        // 步数上限防止损坏数据中的环
        for _ in 0..=index.len() {
            match current.and_then(|id| index.get(&id)) {
                Some((false, _)) => return false,
                Some((true, parent)) => current = *parent,
                None => return true,
            }
        }
        true
    };

    nodes.into_iter().filter(|n| effective(n)).collect()
}

#[async_trait]
impl QueryHandler<GetLocationQuery> for LocationCatalog {
    type Error = LocationError;

    async fn handle(&self, query: GetLocationQuery) -> LocationResult<LocationNode> {
        self.locations
            .get_node(&query.location_id)
            .await?
            .ok_or(LocationError::NotFound(query.location_id))
    }
}

#[async_trait]
impl QueryHandler<ListLocationsQuery> for LocationCatalog {
    type Error = LocationError;

    async fn handle(&self, query: ListLocationsQuery) -> LocationResult<Vec<LocationNode>> {
        let nodes = self
            .locations
            .list_nodes(&query.warehouse_id, &query.filter)
            .await?;
        debug!(warehouse_id = %query.warehouse_id, count = nodes.len(), "Locations listed");
        Ok(nodes)
    }
}

#[async_trait]
impl QueryHandler<GetLocationTreeQuery> for LocationCatalog {
    type Error = LocationError;

    async fn handle(&self, query: GetLocationTreeQuery) -> LocationResult<Vec<TreeNode>> {
        let mut nodes = self
            .locations
            .list_nodes(&query.warehouse_id, &LocationFilter::all())
            .await?;
        if !query.include_inactive {
            nodes = retain_effectively_active(nodes);
        }
        Ok(build_tree(nodes))
    }
}

#[async_trait]
impl QueryHandler<GetLayoutQuery> for LocationCatalog {
    type Error = LocationError;

    async fn handle(&self, query: GetLayoutQuery) -> LocationResult<WarehouseLayout> {
        self.layouts
            .find_current(&query.warehouse_id)
            .await?
            .ok_or(LocationError::LayoutNotFound(query.warehouse_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewLocation;
    use crate::domain::value_objects::{LocationLabel, WarehouseId};

    #[test]
    fn test_inactive_ancestor_hides_descendants() {
        let wh = WarehouseId::new();
        let label = |raw: &str| LocationLabel::parse(raw).unwrap();
        let zone = LocationNode::derive(&NewLocation::zone(wh, label("a")), None).unwrap();
        let mut aisle =
            LocationNode::derive(&NewLocation::aisle(wh, *zone.id(), label("a1")), Some(&zone))
                .unwrap();
        let bin =
            LocationNode::derive(&NewLocation::bin(wh, *aisle.id(), label("l1")), Some(&aisle))
                .unwrap();
        aisle.set_active(false, None);

        let kept = retain_effectively_active(vec![bin, aisle, zone]);
        let codes: Vec<_> = kept.iter().map(|n| n.code()).collect();
        assert_eq!(codes, vec!["ZONE-A"]);
    }
}
