//! 数据库行映射结构

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entities::LayoutRect;

/// 库位数据库行
#[derive(Debug, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub depth: i16,
    pub code: String,
    pub path: String,
    pub zone: String,
    pub aisle: Option<String>,
    pub bin_code: Option<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

/// 级联选择的货位行
#[derive(Debug, FromRow)]
pub struct LevelRow {
    pub id: Uuid,
    pub code: String,
    pub bin_code: String,
}

/// 布局数据库行
#[derive(Debug, FromRow)]
pub struct LayoutRow {
    pub warehouse_id: Uuid,
    pub name: String,
    pub version: i64,
    pub rects: Json<Vec<LayoutRect>>,
}
