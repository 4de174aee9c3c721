//! 级联选择的货位选项

use serde::{Deserialize, Serialize};

use super::LocationId;

/// 可选择的货位（叶子节点）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOption {
    pub id: LocationId,
    pub code: String,
    /// 货位标签，例如 `L1`
    pub level: String,
}
