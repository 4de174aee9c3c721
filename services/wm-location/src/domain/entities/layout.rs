//! 仓库布局
//!
//! 由布局编辑器维护的矩形集合，序列化为每个仓库一份 JSON 文档

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::WarehouseId;
use crate::error::{LocationError, LocationResult};

/// 矩形类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectKind {
    Zone,
    Aisle,
    Bin,
    Dock,
    Office,
}

impl RectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zone => "zone",
            Self::Aisle => "aisle",
            Self::Bin => "bin",
            Self::Dock => "dock",
            Self::Office => "office",
        }
    }
}

impl fmt::Display for RectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 轴对齐矩形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRect {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RectKind,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// 编辑器记录的父矩形，仅作参考，编译时不使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl LayoutRect {
    pub fn new(
        id: impl Into<String>,
        kind: RectKind,
        name: impl Into<String>,
        (x, y, width, height): (f64, f64, f64, f64),
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            x,
            y,
            width,
            height,
            parent_id: None,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// `other` 的包围盒是否完全位于本矩形内（边界重合视为包含）
    pub fn contains(&self, other: &LayoutRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("rectangle id must not be empty".to_string());
        }
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(format!("rectangle {} has non-finite geometry", self.id));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!("rectangle {} must have a positive size", self.id));
        }
        Ok(())
    }
}

/// 仓库当前布局
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseLayout {
    pub warehouse_id: WarehouseId,
    pub name: String,
    /// 每次保存递增，首个版本为 1
    #[serde(default)]
    pub version: i64,
    pub rects: Vec<LayoutRect>,
}

impl WarehouseLayout {
    pub fn new(warehouse_id: WarehouseId, name: impl Into<String>, rects: Vec<LayoutRect>) -> Self {
        Self {
            warehouse_id,
            name: name.into(),
            version: 0,
            rects,
        }
    }

    pub fn rects_of(&self, kind: RectKind) -> impl Iterator<Item = &LayoutRect> {
        self.rects.iter().filter(move |r| r.kind == kind)
    }

    /// 校验矩形数量、几何与 ID 唯一性
    pub fn validate(&self, max_rects: usize) -> LocationResult<()> {
        if self.name.trim().is_empty() {
            return Err(LocationError::InvalidLayout(
                "layout name must not be empty".to_string(),
            ));
        }
        if self.rects.len() > max_rects {
            return Err(LocationError::InvalidLayout(format!(
                "layout has {} rectangles, at most {} allowed",
                self.rects.len(),
                max_rects
            )));
        }

        let mut seen = HashSet::with_capacity(self.rects.len());
        for rect in &self.rects {
            rect.validate().map_err(LocationError::InvalidLayout)?;
            if !seen.insert(rect.id.as_str()) {
                return Err(LocationError::InvalidLayout(format!(
                    "duplicate rectangle id {}",
                    rect.id
                )));
            }
        }
        Ok(())
    }
}
