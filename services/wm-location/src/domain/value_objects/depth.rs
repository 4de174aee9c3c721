//! 库位层级深度

use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点深度：0 区，1 巷道，2 货位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationDepth {
    Zone,
    Aisle,
    Bin,
}

impl LocationDepth {
    pub const ALL: [LocationDepth; 3] = [Self::Zone, Self::Aisle, Self::Bin];

    pub fn as_i16(self) -> i16 {
        match self {
            Self::Zone => 0,
            Self::Aisle => 1,
            Self::Bin => 2,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Zone),
            1 => Some(Self::Aisle),
            2 => Some(Self::Bin),
            _ => None,
        }
    }

    /// 父节点应处的深度
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Zone => None,
            Self::Aisle => Some(Self::Zone),
            Self::Bin => Some(Self::Aisle),
        }
    }

    /// 子节点应处的深度
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Zone => Some(Self::Aisle),
            Self::Aisle => Some(Self::Bin),
            Self::Bin => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zone => "zone",
            Self::Aisle => "aisle",
            Self::Bin => "bin",
        }
    }
}

impl fmt::Display for LocationDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_child_are_inverse() {
        for depth in LocationDepth::ALL {
            if let Some(child) = depth.child() {
                assert_eq!(child.parent(), Some(depth));
                assert_eq!(child.as_i16(), depth.as_i16() + 1);
            }
        }
        assert_eq!(LocationDepth::Zone.parent(), None);
        assert_eq!(LocationDepth::Bin.child(), None);
    }

    #[test]
    fn test_i16_mapping() {
        for depth in LocationDepth::ALL {
            assert_eq!(LocationDepth::from_i16(depth.as_i16()), Some(depth));
        }
        assert_eq!(LocationDepth::from_i16(3), None);
        assert_eq!(LocationDepth::from_i16(-1), None);
    }
}
