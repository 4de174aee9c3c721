//! 手工构建测试

mod support;

use support::Fixture;
use wm_location::application::*;
use wm_location::domain::value_objects::{LocationDepth, LocationId};

#[tokio::test]
async fn test_zone_aisle_bin_codes() {
    let fx = Fixture::new();
    let zone = fx.zone(" a ").await;
    assert_eq!(zone.code(), "ZONE-A");
    assert_eq!(zone.path(), "A");
    assert!(zone.is_root());

    let created = fx.aisle(*zone.id(), "a1", 1).await;
    assert_eq!(created.aisle.code(), "A-A1");
    assert_eq!(created.aisle.parent_id(), Some(zone.id()));
    assert!(created.levels.is_empty());

    let bin = fx.bin(*created.aisle.id(), "l1").await;
    assert_eq!(bin.code(), "A-A1-L1");
    assert_eq!(bin.depth(), LocationDepth::Bin);
    assert_eq!(bin.zone().as_str(), "A");
    assert_eq!(bin.aisle().map(|a| a.as_str()), Some("A1"));
    assert_eq!(bin.bin_code().map(|b| b.as_str()), Some("L1"));
}

#[tokio::test]
async fn test_aisle_prepopulates_levels() {
    let fx = Fixture::new();
    let zone = fx.zone("B").await;
    let created = fx.aisle(*zone.id(), "B2", 3).await;

    let codes: Vec<_> = created.levels.iter().map(|l| l.code()).collect();
    assert_eq!(codes, vec!["B-B2-L1", "B-B2-L2", "B-B2-L3"]);
    assert!(
        created
            .levels
            .iter()
            .all(|l| l.parent_id() == Some(created.aisle.id()))
    );
    assert_eq!(fx.locations.len().await, 5);
}

#[tokio::test]
async fn test_level_count_bounds() {
    let fx = Fixture::new();
    let zone = fx.zone("A").await;

    for level_count in [0, MAX_LEVEL_COUNT + 1] {
        let err = fx
            .handler
            .create_aisle(CreateAisleCommand {
                zone_id: *zone.id(),
                label: "A1".to_string(),
                level_count,
                prepopulate_levels: true,
                description: None,
                expected_code: None,
                operator: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.tag(), "INVALID_ARGUMENT");
    }
    assert_eq!(fx.locations.len().await, 1);
}

#[tokio::test]
async fn test_aisle_requires_zone_parent() {
    let fx = Fixture::new();
    let zone = fx.zone("A").await;
    let aisle = fx.aisle(*zone.id(), "A1", 1).await.aisle;

    let err = fx
        .handler
        .create_aisle(CreateAisleCommand {
            zone_id: *aisle.id(),
            label: "X".to_string(),
            level_count: 1,
            prepopulate_levels: false,
            description: None,
            expected_code: None,
            operator: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "DEPTH_MISMATCH");

    let err = fx
        .handler
        .create_bin(CreateBinCommand {
            aisle_id: LocationId::new(),
            label: "L1".to_string(),
            description: None,
            expected_code: None,
            operator: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "PARENT_NOT_FOUND");
}

#[tokio::test]
async fn test_expected_code_must_match() {
    let fx = Fixture::new();
    let zone = fx.zone("A").await;

    let err = fx
        .handler
        .create_aisle(CreateAisleCommand {
            zone_id: *zone.id(),
            label: "A1".to_string(),
            level_count: 1,
            prepopulate_levels: false,
            description: None,
            expected_code: Some("A-A2".to_string()),
            operator: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "CODE_MISMATCH");
    assert_eq!(fx.locations.len().await, 1);

    let ok = fx
        .handler
        .create_zone(CreateZoneCommand {
            warehouse_id: fx.warehouse_id,
            label: "c".to_string(),
            description: Some("  cold room ".to_string()),
            expected_code: Some("zone-c".to_string()),
            operator: None,
        })
        .await
        .unwrap();
    assert_eq!(ok.code(), "ZONE-C");
    assert_eq!(ok.description(), Some("cold room"));
}

#[tokio::test]
async fn test_duplicate_and_invalid_labels() {
    let fx = Fixture::new();
    fx.zone("A").await;

    let dup = fx
        .handler
        .create_zone(CreateZoneCommand {
            warehouse_id: fx.warehouse_id,
            label: "a".to_string(),
            description: None,
            expected_code: None,
            operator: None,
        })
        .await
        .unwrap_err();
    assert_eq!(dup.tag(), "DUPLICATE_CODE");

    for label in ["", "   ", "A-B", "A B"] {
        let err = fx
            .handler
            .create_zone(CreateZoneCommand {
                warehouse_id: fx.warehouse_id,
                label: label.to_string(),
                description: None,
                expected_code: None,
                operator: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.tag(), "INVALID_LABEL", "label {:?}", label);
    }
}

#[tokio::test]
async fn test_zone_prefix_label_cannot_name_a_zone() {
    let fx = Fixture::new();
    let x = fx.zone("X").await;
    assert_eq!(x.code(), "ZONE-X");

    let err = fx
        .handler
        .create_zone(CreateZoneCommand {
            warehouse_id: fx.warehouse_id,
            label: " zone ".to_string(),
            description: None,
            expected_code: Some("ZONE-ZONE".to_string()),
            operator: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "INVALID_LABEL");

    let err = fx
        .handler
        .preview_code(PreviewCodeQuery {
            parent_id: None,
            label: "Zone".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "INVALID_LABEL");

    // 非区层级仍可使用该标签，编码不会与区编码相撞
    let created = fx.aisle(*x.id(), "zone", 1).await;
    assert_eq!(created.aisle.code(), "X-ZONE");
    assert_eq!(fx.codes().await, vec!["ZONE-X", "X-ZONE"]);
}

#[tokio::test]
async fn test_inactive_parent_rejects_children() {
    let fx = Fixture::new();
    let zone = fx.zone("A").await;
    fx.deactivate(*zone.id()).await;

    let err = fx
        .handler
        .create_aisle(CreateAisleCommand {
            zone_id: *zone.id(),
            label: "A1".to_string(),
            level_count: 1,
            prepopulate_levels: false,
            description: None,
            expected_code: None,
            operator: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "INACTIVE_PARENT");
}

#[tokio::test]
async fn test_preview_code() {
    let fx = Fixture::new();
    let zone = fx.zone("A").await;
    let created = fx.aisle(*zone.id(), "A1", 2).await;

    let preview = |parent_id: Option<LocationId>, label: &str| PreviewCodeQuery {
        parent_id,
        label: label.to_string(),
    };

    assert_eq!(fx.handler.preview_code(preview(None, "b")).await.unwrap(), "ZONE-B");
    assert_eq!(
        fx.handler
            .preview_code(preview(Some(*zone.id()), "a9"))
            .await
            .unwrap(),
        "A-A9"
    );
    assert_eq!(
        fx.handler
            .preview_code(preview(Some(*created.aisle.id()), "l9"))
            .await
            .unwrap(),
        "A-A1-L9"
    );

    let leaf = *created.levels[0].id();
    let err = fx
        .handler
        .preview_code(preview(Some(leaf), "x"))
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "INVALID_ARGUMENT");

    let err = fx
        .handler
        .preview_code(preview(Some(LocationId::new()), "x"))
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "PARENT_NOT_FOUND");

    // 预览不写入
    assert_eq!(fx.locations.len().await, 4);
}

#[tokio::test]
async fn test_description_update_and_lookup() {
    let fx = Fixture::new();
    let zone = fx.zone("A").await;

    let updated = fx
        .handler
        .update_location_description(UpdateLocationDescriptionCommand {
            location_id: *zone.id(),
            description: Some(" ambient ".to_string()),
            operator: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.description(), Some("ambient"));

    let fetched = fx
        .handler
        .get_location(GetLocationQuery {
            location_id: *zone.id(),
        })
        .await
        .unwrap();
    assert_eq!(fetched, updated);

    let err = fx
        .handler
        .get_location(GetLocationQuery {
            location_id: LocationId::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "NOT_FOUND");
}
