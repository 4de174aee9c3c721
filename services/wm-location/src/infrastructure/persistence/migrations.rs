//! 库位服务的数据库迁移

use adapter_postgres::Migration;

pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "warehouse_locations",
            include_str!("../../../migrations/0001_warehouse_locations.sql"),
        ),
        Migration::new(
            2,
            "warehouse_layouts",
            include_str!("../../../migrations/0002_warehouse_layouts.sql"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_ascending() {
        let all = migrations();
        assert!(all.windows(2).all(|w| w[0].version < w[1].version));
        assert!(all.iter().all(|m| !m.up_sql.trim().is_empty()));
    }
}
