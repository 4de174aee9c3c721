//! 通用工具函数

use uuid::Uuid;

/// 生成新的 UUID v7（时间有序）
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// 规范化用户输入的标签：去除首尾空白并转为大写
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  a1 "), "A1");
        assert_eq!(normalize_label("zone"), "ZONE");
        assert_eq!(normalize_label("   "), "");
    }

    #[test]
    fn test_new_id_is_v7() {
        let id = new_id();
        assert_eq!(id.get_version_num(), 7);
        assert_ne!(id, new_id());
    }
}
