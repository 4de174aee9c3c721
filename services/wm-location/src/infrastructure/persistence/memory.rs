//! 内存仓储
//!
//! 用于测试与本地运行。父节点校验、推导与编码唯一性检查在同一把写锁内完成。

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use common::OperatorId;
use tokio::sync::RwLock;

use crate::domain::entities::{LocationNode, NewLocation, WarehouseLayout};
use crate::domain::repositories::{LayoutRepository, LocationFilter, LocationRepository};
use crate::domain::value_objects::{LevelOption, LocationDepth, LocationId, WarehouseId};
use crate::error::{LocationError, LocationResult};

#[derive(Default)]
struct Arena {
    nodes: HashMap<LocationId, LocationNode>,
    codes: HashMap<(WarehouseId, String), LocationId>,
}

impl Arena {
    /// 节点及其所有祖先都启用
    fn effectively_active(&self, node: &LocationNode) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if !n.is_active() {
                return false;
            }
            current = n.parent_id().and_then(|p| self.nodes.get(p));
        }
        true
    }

    fn selectable<'a>(
        &'a self,
        warehouse_id: &'a WarehouseId,
        depth: LocationDepth,
    ) -> impl Iterator<Item = &'a LocationNode> + 'a {
        self.nodes.values().filter(move |n| {
            n.warehouse_id() == warehouse_id && n.depth() == depth && self.effectively_active(n)
        })
    }
}

#[derive(Default)]
pub struct InMemoryLocationRepository {
    arena: RwLock<Arena>,
}

impl InMemoryLocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.arena.read().await.nodes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 直接写入已推导的节点，绕过校验
    pub async fn restore(&self, node: LocationNode) {
        let mut arena = self.arena.write().await;
        arena
            .codes
            .insert((*node.warehouse_id(), node.code().to_string()), *node.id());
        arena.nodes.insert(*node.id(), node);
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn list_nodes(
        &self,
        warehouse_id: &WarehouseId,
        filter: &LocationFilter,
    ) -> LocationResult<Vec<LocationNode>> {
        let arena = self.arena.read().await;
        let mut nodes: Vec<LocationNode> = arena
            .nodes
            .values()
            .filter(|n| n.warehouse_id() == warehouse_id && filter.matches(n))
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.path().cmp(b.path()).then_with(|| a.id().cmp(b.id())));
        Ok(nodes)
    }

    async fn get_node(&self, id: &LocationId) -> LocationResult<Option<LocationNode>> {
        Ok(self.arena.read().await.nodes.get(id).cloned())
    }

    async fn find_by_code(
        &self,
        warehouse_id: &WarehouseId,
        code: &str,
    ) -> LocationResult<Option<LocationNode>> {
        let arena = self.arena.read().await;
        Ok(arena
            .codes
            .get(&(*warehouse_id, code.to_string()))
            .and_then(|id| arena.nodes.get(id))
            .cloned())
    }

    async fn insert_node(&self, candidate: NewLocation) -> LocationResult<LocationNode> {
        let mut arena = self.arena.write().await;
        let parent = candidate.parent_id().and_then(|id| arena.nodes.get(id));
        let node = LocationNode::derive(&candidate, parent)?;

        let key = (*node.warehouse_id(), node.code().to_string());
        if arena.codes.contains_key(&key) {
            return Err(LocationError::DuplicateCode {
                warehouse_id: key.0,
                code: key.1,
            });
        }
        arena.codes.insert(key, *node.id());
        arena.nodes.insert(*node.id(), node.clone());
        Ok(node)
    }

    async fn set_active(
        &self,
        id: &LocationId,
        is_active: bool,
        operator: Option<OperatorId>,
    ) -> LocationResult<LocationNode> {
        let mut arena = self.arena.write().await;
        let node = arena
            .nodes
            .get_mut(id)
            .ok_or(LocationError::NotFound(*id))?;
        node.set_active(is_active, operator);
        Ok(node.clone())
    }

    async fn update_description(
        &self,
        id: &LocationId,
        description: Option<String>,
        operator: Option<OperatorId>,
    ) -> LocationResult<LocationNode> {
        let mut arena = self.arena.write().await;
        let node = arena
            .nodes
            .get_mut(id)
            .ok_or(LocationError::NotFound(*id))?;
        node.update_description(description, operator);
        Ok(node.clone())
    }

    async fn list_lots(&self, warehouse_id: &WarehouseId) -> LocationResult<Vec<String>> {
        let arena = self.arena.read().await;
        let lots: BTreeSet<String> = arena
            .selectable(warehouse_id, LocationDepth::Zone)
            .map(|n| n.zone().to_string())
            .collect();
        Ok(lots.into_iter().collect())
    }

    async fn list_carts(
        &self,
        warehouse_id: &WarehouseId,
        lot: &str,
    ) -> LocationResult<Vec<String>> {
        let arena = self.arena.read().await;
        let carts: BTreeSet<String> = arena
            .selectable(warehouse_id, LocationDepth::Aisle)
            .filter(|n| n.zone().as_str() == lot)
            .filter_map(|n| n.aisle().map(|a| a.to_string()))
            .collect();
        Ok(carts.into_iter().collect())
    }

    async fn list_levels(
        &self,
        warehouse_id: &WarehouseId,
        lot: &str,
        cart: &str,
    ) -> LocationResult<Vec<LevelOption>> {
        let arena = self.arena.read().await;
        let mut levels: Vec<LevelOption> = arena
            .selectable(warehouse_id, LocationDepth::Bin)
            .filter(|n| n.zone().as_str() == lot && n.aisle().map(|a| a.as_str()) == Some(cart))
            .filter_map(|n| {
                n.bin_code().map(|level| LevelOption {
                    id: *n.id(),
                    code: n.code().to_string(),
                    level: level.to_string(),
                })
            })
            .collect();
        levels.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(levels)
    }
}

#[derive(Default)]
pub struct InMemoryLayoutRepository {
    layouts: RwLock<HashMap<WarehouseId, WarehouseLayout>>,
}

impl InMemoryLayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LayoutRepository for InMemoryLayoutRepository {
    async fn find_current(
        &self,
        warehouse_id: &WarehouseId,
    ) -> LocationResult<Option<WarehouseLayout>> {
        Ok(self.layouts.read().await.get(warehouse_id).cloned())
    }

    async fn save(
        &self,
        mut layout: WarehouseLayout,
        _operator: Option<OperatorId>,
    ) -> LocationResult<WarehouseLayout> {
        let mut layouts = self.layouts.write().await;
        layout.version = layouts
            .get(&layout.warehouse_id)
            .map_or(1, |current| current.version + 1);
        layouts.insert(layout.warehouse_id, layout.clone());
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LayoutRect, RectKind};
    use crate::domain::value_objects::LocationLabel;

    fn label(raw: &str) -> LocationLabel {
        LocationLabel::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let repo = InMemoryLocationRepository::new();
        let wh = WarehouseId::new();
        repo.insert_node(NewLocation::zone(wh, label("a"))).await.unwrap();

        let err = repo
            .insert_node(NewLocation::zone(wh, label("A")))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_code());
        assert_eq!(repo.len().await, 1);

        // 其他仓库可复用同一编码
        repo.insert_node(NewLocation::zone(WarehouseId::new(), label("a")))
            .await
            .unwrap();
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_inactive_zone_hides_descendants() {
        let repo = InMemoryLocationRepository::new();
        let wh = WarehouseId::new();
        let zone = repo.insert_node(NewLocation::zone(wh, label("a"))).await.unwrap();
        let aisle = repo
            .insert_node(NewLocation::aisle(wh, *zone.id(), label("a1")))
            .await
            .unwrap();
        repo.insert_node(NewLocation::bin(wh, *aisle.id(), label("l1")))
            .await
            .unwrap();
        assert_eq!(repo.list_levels(&wh, "A", "A1").await.unwrap().len(), 1);

        repo.set_active(zone.id(), false, None).await.unwrap();
        assert!(repo.list_lots(&wh).await.unwrap().is_empty());
        assert!(repo.list_carts(&wh, "A").await.unwrap().is_empty());
        assert!(repo.list_levels(&wh, "A", "A1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_layout_version_increments() {
        let repo = InMemoryLayoutRepository::new();
        let wh = WarehouseId::new();
        let rects = vec![LayoutRect::new("z1", RectKind::Zone, "A", (0.0, 0.0, 10.0, 10.0))];

        let first = repo
            .save(WarehouseLayout::new(wh, "floor", rects.clone()), None)
            .await
            .unwrap();
        let second = repo
            .save(WarehouseLayout::new(wh, "floor", rects), None)
            .await
            .unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(repo.find_current(&wh).await.unwrap().unwrap().version, 2);
    }
}
