//! PostgreSQL 仓储实现

use adapter_postgres::{is_unique_violation, map_sqlx_error};
use async_trait::async_trait;
use common::OperatorId;
use domain_core::AggregateRoot;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::entities::{LocationNode, NewLocation, WarehouseLayout};
use crate::domain::repositories::{LayoutRepository, LocationFilter, LocationRepository};
use crate::domain::value_objects::{LevelOption, LocationDepth, LocationId, WarehouseId};
use crate::error::{LocationError, LocationResult};

use super::converters::{layout_from_row, level_from_row, location_from_row};
use super::rows::{LayoutRow, LevelRow, LocationRow};

const LOCATION_COLUMNS: &str = r#"
    id, warehouse_id, parent_id, depth, code, path, zone, aisle, bin_code,
    is_active, description, created_at, created_by, updated_at, updated_by
"#;

fn operator_uuid(operator: Option<OperatorId>) -> Option<uuid::Uuid> {
    operator.map(|o| o.0)
}

// ============================================================================
// LocationRepository 实现
// ============================================================================

pub struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn rows_to_nodes(rows: Vec<LocationRow>) -> LocationResult<Vec<LocationNode>> {
        rows.into_iter().map(location_from_row).collect()
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_nodes(
        &self,
        warehouse_id: &WarehouseId,
        filter: &LocationFilter,
    ) -> LocationResult<Vec<LocationNode>> {
        let sql = format!(
            r#"
            SELECT {LOCATION_COLUMNS}
            FROM warehouse_locations
            WHERE warehouse_id = $1
              AND ($2::SMALLINT IS NULL OR depth = $2)
              AND ($3::UUID IS NULL OR parent_id = $3)
              AND ($4::VARCHAR IS NULL OR zone = $4)
              AND ($5::VARCHAR IS NULL OR aisle = $5)
              AND ($6::BOOLEAN IS NULL OR is_active = $6)
            ORDER BY path, id
            "#
        );
        let rows = sqlx::query_as::<_, LocationRow>(&sql)
            .bind(warehouse_id.0)
            .bind(filter.depth.map(LocationDepth::as_i16))
            .bind(filter.parent_id.map(|p| p.0))
            .bind(filter.zone.as_deref())
            .bind(filter.aisle.as_deref())
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Self::rows_to_nodes(rows)
    }

    async fn get_node(&self, id: &LocationId) -> LocationResult<Option<LocationNode>> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM warehouse_locations WHERE id = $1");
        let row = sqlx::query_as::<_, LocationRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(location_from_row).transpose()
    }

    async fn find_by_code(
        &self,
        warehouse_id: &WarehouseId,
        code: &str,
    ) -> LocationResult<Option<LocationNode>> {
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM warehouse_locations WHERE warehouse_id = $1 AND code = $2"
        );
        let row = sqlx::query_as::<_, LocationRow>(&sql)
            .bind(warehouse_id.0)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(location_from_row).transpose()
    }

    async fn insert_node(&self, candidate: NewLocation) -> LocationResult<LocationNode> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // 共享锁防止父节点在推导与插入之间被修改
        let parent = match candidate.parent_id() {
            Some(parent_id) => {
                let sql = format!(
                    "SELECT {LOCATION_COLUMNS} FROM warehouse_locations WHERE id = $1 FOR SHARE"
                );
                sqlx::query_as::<_, LocationRow>(&sql)
                    .bind(parent_id.0)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?
                    .map(location_from_row)
                    .transpose()?
            }
            None => None,
        };

        let node = LocationNode::derive(&candidate, parent.as_ref())?;
        let audit = node.audit_info();

        let inserted = sqlx::query(
            r#"
            INSERT INTO warehouse_locations (
                id, warehouse_id, parent_id, depth, code, path, zone, aisle, bin_code,
                is_active, description, created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(node.id().0)
        .bind(node.warehouse_id().0)
        .bind(node.parent_id().map(|p| p.0))
        .bind(node.depth().as_i16())
        .bind(node.code())
        .bind(node.path())
        .bind(node.zone().as_str())
        .bind(node.aisle().map(|a| a.as_str()))
        .bind(node.bin_code().map(|b| b.as_str()))
        .bind(node.is_active())
        .bind(node.description())
        .bind(audit.created_at)
        .bind(operator_uuid(audit.created_by.clone()))
        .bind(audit.updated_at)
        .bind(operator_uuid(audit.updated_by.clone()))
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            if is_unique_violation(&e) {
                return Err(LocationError::DuplicateCode {
                    warehouse_id: *node.warehouse_id(),
                    code: node.code().to_string(),
                });
            }
            return Err(map_sqlx_error(e).into());
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(node)
    }

    async fn set_active(
        &self,
        id: &LocationId,
        is_active: bool,
        operator: Option<OperatorId>,
    ) -> LocationResult<LocationNode> {
        let sql = format!(
            r#"
            UPDATE warehouse_locations
            SET is_active = $2, updated_at = NOW(), updated_by = $3
            WHERE id = $1
            RETURNING {LOCATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, LocationRow>(&sql)
            .bind(id.0)
            .bind(is_active)
            .bind(operator_uuid(operator))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(LocationError::NotFound(*id))?;

        location_from_row(row)
    }

    async fn update_description(
        &self,
        id: &LocationId,
        description: Option<String>,
        operator: Option<OperatorId>,
    ) -> LocationResult<LocationNode> {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let sql = format!(
            r#"
            UPDATE warehouse_locations
            SET description = $2, updated_at = NOW(), updated_by = $3
            WHERE id = $1
            RETURNING {LOCATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, LocationRow>(&sql)
            .bind(id.0)
            .bind(description)
            .bind(operator_uuid(operator))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(LocationError::NotFound(*id))?;

        location_from_row(row)
    }

    async fn list_lots(&self, warehouse_id: &WarehouseId) -> LocationResult<Vec<String>> {
        let lots = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT zone
            FROM warehouse_locations
            WHERE warehouse_id = $1 AND depth = 0 AND is_active
            ORDER BY zone
            "#,
        )
        .bind(warehouse_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(lots)
    }

    async fn list_carts(
        &self,
        warehouse_id: &WarehouseId,
        lot: &str,
    ) -> LocationResult<Vec<String>> {
        let carts = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT a.aisle
            FROM warehouse_locations a
            JOIN warehouse_locations z ON z.id = a.parent_id
            WHERE a.warehouse_id = $1 AND a.depth = 1 AND a.zone = $2
              AND a.is_active AND z.is_active
            ORDER BY a.aisle
            "#,
        )
        .bind(warehouse_id.0)
        .bind(lot)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(carts)
    }

    async fn list_levels(
        &self,
        warehouse_id: &WarehouseId,
        lot: &str,
        cart: &str,
    ) -> LocationResult<Vec<LevelOption>> {
        let rows = sqlx::query_as::<_, LevelRow>(
            r#"
            SELECT b.id, b.code, b.bin_code
            FROM warehouse_locations b
            JOIN warehouse_locations a ON a.id = b.parent_id
            JOIN warehouse_locations z ON z.id = a.parent_id
            WHERE b.warehouse_id = $1 AND b.depth = 2 AND b.zone = $2 AND b.aisle = $3
              AND b.is_active AND a.is_active AND z.is_active
            ORDER BY b.code
            "#,
        )
        .bind(warehouse_id.0)
        .bind(lot)
        .bind(cart)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(level_from_row).collect())
    }
}

// ============================================================================
// LayoutRepository 实现
// ============================================================================

pub struct PostgresLayoutRepository {
    pool: PgPool,
}

impl PostgresLayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LayoutRepository for PostgresLayoutRepository {
    async fn find_current(
        &self,
        warehouse_id: &WarehouseId,
    ) -> LocationResult<Option<WarehouseLayout>> {
        let row = sqlx::query_as::<_, LayoutRow>(
            "SELECT warehouse_id, name, version, rects FROM warehouse_layouts WHERE warehouse_id = $1",
        )
        .bind(warehouse_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(layout_from_row))
    }

    async fn save(
        &self,
        layout: WarehouseLayout,
        operator: Option<OperatorId>,
    ) -> LocationResult<WarehouseLayout> {
        let row = sqlx::query_as::<_, LayoutRow>(
            r#"
            INSERT INTO warehouse_layouts (warehouse_id, name, version, rects, updated_at, updated_by)
            VALUES ($1, $2, 1, $3, NOW(), $4)
            ON CONFLICT (warehouse_id) DO UPDATE
            SET name = EXCLUDED.name,
                rects = EXCLUDED.rects,
                version = warehouse_layouts.version + 1,
                updated_at = EXCLUDED.updated_at,
                updated_by = EXCLUDED.updated_by
            RETURNING warehouse_id, name, version, rects
            "#,
        )
        .bind(layout.warehouse_id.0)
        .bind(&layout.name)
        .bind(Json(&layout.rects))
        .bind(operator_uuid(operator))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(layout_from_row(row))
    }
}
