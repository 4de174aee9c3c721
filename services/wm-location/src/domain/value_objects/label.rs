//! 库位标签与编码推导
//!
//! 标签规范化为大写，不允许包含路径分隔符或空白，
//! 因此按 `-` 拆分 `path` 总能还原 zone/aisle/bin 三列

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 路径与编码分隔符
pub const PATH_SEPARATOR: char = '-';

/// 区编码前缀
pub const ZONE_CODE_PREFIX: &str = "ZONE";

/// 标签最大长度（字符数）
pub const MAX_LABEL_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label must not be empty")]
    Empty,
    #[error("label {label:?} exceeds {max} characters")]
    TooLong { label: String, max: usize },
    #[error("label {label:?} contains forbidden character {found:?}")]
    ForbiddenCharacter { label: String, found: char },
    #[error("label {label:?} is reserved for zone codes")]
    Reserved { label: String },
}

/// 规范化后的库位标签
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationLabel(String);

impl LocationLabel {
    /// 去除首尾空白、转大写后校验
    pub fn parse(raw: &str) -> Result<Self, LabelError> {
        let label = common::utils::normalize_label(raw);
        if label.is_empty() {
            return Err(LabelError::Empty);
        }
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(LabelError::TooLong {
                label,
                max: MAX_LABEL_LEN,
            });
        }
        if let Some(found) = label
            .chars()
            .find(|c| *c == PATH_SEPARATOR || c.is_whitespace())
        {
            return Err(LabelError::ForbiddenCharacter { label, found });
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LocationLabel {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocationLabel> for String {
    fn from(label: LocationLabel) -> Self {
        label.0
    }
}

impl AsRef<str> for LocationLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 校验区标签
///
/// 区标签不能等于编码前缀，否则该区下巷道 `ZONE-{AISLE}` 与区编码 `ZONE-{ZONE}` 同形
pub fn check_zone_label(label: &LocationLabel) -> Result<(), LabelError> {
    if label.as_str() == ZONE_CODE_PREFIX {
        return Err(LabelError::Reserved {
            label: label.to_string(),
        });
    }
    Ok(())
}

/// 区编码：`ZONE-{ZONE}`
pub fn zone_code(zone: &LocationLabel) -> String {
    format!("{}{}{}", ZONE_CODE_PREFIX, PATH_SEPARATOR, zone)
}

/// 子节点路径：`{parent.path}-{LABEL}`
///
/// 巷道与货位的编码与其路径相同
pub fn child_path(parent_path: &str, label: &LocationLabel) -> String {
    format!("{}{}{}", parent_path, PATH_SEPARATOR, label)
}

/// 按分隔符拆分路径，得到 (zone, aisle, bin)
pub fn split_path(path: &str) -> (Option<&str>, Option<&str>, Option<&str>) {
    let mut parts = path.splitn(3, PATH_SEPARATOR);
    (parts.next(), parts.next(), parts.next())
}

/// 预览区编码
pub fn preview_zone_code(raw_label: &str) -> Result<String, LabelError> {
    let label = LocationLabel::parse(raw_label)?;
    check_zone_label(&label)?;
    Ok(zone_code(&label))
}

/// 预览巷道或货位编码
pub fn preview_child_code(parent_path: &str, raw_label: &str) -> Result<String, LabelError> {
    Ok(child_path(parent_path, &LocationLabel::parse(raw_label)?))
}

/// 去除 `{PREFIX}-` 前缀（已规范化的名称）
pub fn strip_label_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(PATH_SEPARATOR))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(LocationLabel::parse("  a1 ").unwrap().as_str(), "A1");
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        assert_eq!(LocationLabel::parse("   "), Err(LabelError::Empty));
        assert!(matches!(
            LocationLabel::parse("A-1"),
            Err(LabelError::ForbiddenCharacter { found: '-', .. })
        ));
        assert!(matches!(
            LocationLabel::parse("A 1"),
            Err(LabelError::ForbiddenCharacter { found: ' ', .. })
        ));
        assert!(matches!(
            LocationLabel::parse(&"X".repeat(MAX_LABEL_LEN + 1)),
            Err(LabelError::TooLong { .. })
        ));
        assert!(LocationLabel::parse(&"X".repeat(MAX_LABEL_LEN)).is_ok());
    }

    #[test]
    fn test_codes() {
        let zone = LocationLabel::parse("a").unwrap();
        let aisle = LocationLabel::parse("a1").unwrap();
        let bin = LocationLabel::parse("l1").unwrap();

        assert_eq!(zone_code(&zone), "ZONE-A");
        let aisle_path = child_path(zone.as_str(), &aisle);
        assert_eq!(aisle_path, "A-A1");
        assert_eq!(child_path(&aisle_path, &bin), "A-A1-L1");
    }

    #[test]
    fn test_split_path_reconstructs_columns() {
        assert_eq!(split_path("A-A1-L1"), (Some("A"), Some("A1"), Some("L1")));
        assert_eq!(split_path("A"), (Some("A"), None, None));
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview_zone_code(" b ").unwrap(), "ZONE-B");
        assert_eq!(preview_child_code("B-B2", "l3").unwrap(), "B-B2-L3");
        assert_eq!(preview_child_code("B", ""), Err(LabelError::Empty));
        assert!(matches!(
            preview_zone_code("zone"),
            Err(LabelError::Reserved { .. })
        ));
        assert_eq!(preview_child_code("A", "zone").unwrap(), "A-ZONE");
    }

    #[test]
    fn test_zone_prefix_is_reserved_for_zones_only() {
        let reserved = LocationLabel::parse(" Zone ").unwrap();
        assert_eq!(
            check_zone_label(&reserved),
            Err(LabelError::Reserved {
                label: "ZONE".to_string()
            })
        );
        assert!(check_zone_label(&LocationLabel::parse("ZONES").unwrap()).is_ok());
    }

    #[test]
    fn test_strip_label_prefix() {
        assert_eq!(strip_label_prefix("A1-L1", "A1"), "L1");
        assert_eq!(strip_label_prefix("L1", "A1"), "L1");
        assert_eq!(strip_label_prefix("A10", "A1"), "A10");
        assert_eq!(strip_label_prefix("A1-", "A1"), "A1-");
    }

    #[test]
    fn test_serde_validates() {
        let label: LocationLabel = serde_json::from_str("\"z9\"").unwrap();
        assert_eq!(label.as_str(), "Z9");
        assert!(serde_json::from_str::<LocationLabel>("\"A-B\"").is_err());
    }
}
