//! 级联库位选择
//!
//! 区 (lot) → 巷道 (cart) → 货位 (level)。只返回自身及所有祖先都启用的节点；
//! 未知仓库、空输入或存储故障都返回空列表。

use std::sync::Arc;

use async_trait::async_trait;
use cqrs_core::InfallibleQueryHandler;
use tracing::{debug, warn};

use crate::domain::repositories::LocationRepository;
use crate::domain::value_objects::LevelOption;
use crate::error::LocationResult;

use super::queries::{ListCartsQuery, ListLevelsQuery, ListLotsQuery};

pub struct LocationResolver {
    repo: Arc<dyn LocationRepository>,
}

impl LocationResolver {
    pub fn new(repo: Arc<dyn LocationRepository>) -> Self {
        Self { repo }
    }
}

/// 规范化选择输入，空白输入返回 None
fn selection(raw: &str) -> Option<String> {
    let normalized = common::utils::normalize_label(raw);
    (!normalized.is_empty()).then_some(normalized)
}

/// 存储故障降级为空列表
fn or_empty<T>(result: LocationResult<Vec<T>>, operation: &'static str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(operation, error = %e, "Location lookup failed, returning empty list");
            Vec::new()
        }
    }
}

#[async_trait]
impl InfallibleQueryHandler<ListLotsQuery> for LocationResolver {
    async fn handle(&self, query: ListLotsQuery) -> Vec<String> {
        let lots = or_empty(self.repo.list_lots(&query.warehouse_id).await, "list_lots");
        debug!(warehouse_id = %query.warehouse_id, count = lots.len(), "Lots listed");
        lots
    }
}

#[async_trait]
impl InfallibleQueryHandler<ListCartsQuery> for LocationResolver {
    async fn handle(&self, query: ListCartsQuery) -> Vec<String> {
        let Some(lot) = selection(&query.lot) else {
            return Vec::new();
        };
        or_empty(
            self.repo.list_carts(&query.warehouse_id, &lot).await,
            "list_carts",
        )
    }
}

#[async_trait]
impl InfallibleQueryHandler<ListLevelsQuery> for LocationResolver {
    async fn handle(&self, query: ListLevelsQuery) -> Vec<LevelOption> {
        let (Some(lot), Some(cart)) = (selection(&query.lot), selection(&query.cart)) else {
            return Vec::new();
        };
        or_empty(
            self.repo
                .list_levels(&query.warehouse_id, &lot, &cart)
                .await,
            "list_levels",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocationError;
    use errors::AppError;

    #[test]
    fn test_selection() {
        assert_eq!(selection(" a1 ").as_deref(), Some("A1"));
        assert_eq!(selection("  "), None);
    }

    #[test]
    fn test_storage_failure_degrades_to_empty() {
        let failed: LocationResult<Vec<String>> =
            Err(LocationError::Storage(AppError::database("connection reset")));
        assert!(or_empty(failed, "list_lots").is_empty());
        assert_eq!(or_empty(Ok(vec![1, 2]), "list_lots"), vec![1, 2]);
    }
}
