//! 布局仓储接口

use async_trait::async_trait;
use common::OperatorId;

use crate::domain::entities::WarehouseLayout;
use crate::domain::value_objects::WarehouseId;
use crate::error::LocationResult;

#[async_trait]
pub trait LayoutRepository: Send + Sync {
    async fn find_current(&self, warehouse_id: &WarehouseId)
    -> LocationResult<Option<WarehouseLayout>>;

    /// 覆盖保存，返回带新版本号的布局
    async fn save(
        &self,
        layout: WarehouseLayout,
        operator: Option<OperatorId>,
    ) -> LocationResult<WarehouseLayout>;
}
