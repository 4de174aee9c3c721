//! 内存仓储测试

use std::sync::Arc;

use wm_location::domain::entities::NewLocation;
use wm_location::domain::repositories::{LocationFilter, LocationRepository};
use wm_location::domain::value_objects::{LocationDepth, LocationId, LocationLabel, WarehouseId};
use wm_location::infrastructure::persistence::InMemoryLocationRepository;

fn label(raw: &str) -> LocationLabel {
    LocationLabel::parse(raw).unwrap()
}

#[tokio::test]
async fn test_concurrent_duplicates_insert_once() {
    let repo = Arc::new(InMemoryLocationRepository::new());
    let wh = WarehouseId::new();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.insert_node(NewLocation::zone(wh, label("A"))).await })
        })
        .collect();

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) if e.is_duplicate_code() => duplicates += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!((created, duplicates), (1, 7));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_children_copy_parent_coordinates() {
    let repo = InMemoryLocationRepository::new();
    let wh = WarehouseId::new();
    let zone = repo.insert_node(NewLocation::zone(wh, label("c"))).await.unwrap();
    let aisle = repo
        .insert_node(NewLocation::aisle(wh, *zone.id(), label("c7")))
        .await
        .unwrap();
    let bin = repo
        .insert_node(NewLocation::bin(wh, *aisle.id(), label("l4")))
        .await
        .unwrap();

    assert_eq!(aisle.depth(), LocationDepth::Aisle);
    assert_eq!(aisle.zone(), zone.zone());
    assert_eq!(bin.zone(), zone.zone());
    assert_eq!(bin.aisle(), aisle.aisle());
    assert_eq!(bin.path(), format!("{}-L4", aisle.path()));
    assert!(bin.is_leaf());

    // 跨仓库挂载视为父节点不存在
    let err = repo
        .insert_node(NewLocation::aisle(WarehouseId::new(), *zone.id(), label("x")))
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "PARENT_NOT_FOUND");

    let err = repo
        .insert_node(NewLocation::bin(wh, *zone.id(), label("x")))
        .await
        .unwrap_err();
    assert_eq!(err.tag(), "DEPTH_MISMATCH");
}

#[tokio::test]
async fn test_list_filters() {
    let repo = InMemoryLocationRepository::new();
    let wh = WarehouseId::new();
    let a = repo.insert_node(NewLocation::zone(wh, label("A"))).await.unwrap();
    let b = repo.insert_node(NewLocation::zone(wh, label("B"))).await.unwrap();
    let a1 = repo
        .insert_node(NewLocation::aisle(wh, *a.id(), label("A1")))
        .await
        .unwrap();
    repo.insert_node(NewLocation::aisle(wh, *b.id(), label("B1")))
        .await
        .unwrap();
    repo.insert_node(NewLocation::bin(wh, *a1.id(), label("L1")))
        .await
        .unwrap();
    repo.set_active(b.id(), false, None).await.unwrap();

    let codes = |nodes: Vec<wm_location::domain::entities::LocationNode>| {
        nodes.iter().map(|n| n.code().to_string()).collect::<Vec<_>>()
    };

    let all = repo.list_nodes(&wh, &LocationFilter::all()).await.unwrap();
    assert_eq!(codes(all), vec!["ZONE-A", "A-A1", "A-A1-L1", "ZONE-B", "B-B1"]);

    let aisles = repo
        .list_nodes(&wh, &LocationFilter::all().depth(LocationDepth::Aisle))
        .await
        .unwrap();
    assert_eq!(codes(aisles), vec!["A-A1", "B-B1"]);

    let children = repo
        .list_nodes(&wh, &LocationFilter::all().parent(*a1.id()))
        .await
        .unwrap();
    assert_eq!(codes(children), vec!["A-A1-L1"]);

    let in_b = repo
        .list_nodes(&wh, &LocationFilter::all().zone(" b "))
        .await
        .unwrap();
    assert_eq!(codes(in_b), vec!["ZONE-B", "B-B1"]);

    // 启用过滤只看节点自身状态
    let active = repo
        .list_nodes(&wh, &LocationFilter::all().zone("b").active(true))
        .await
        .unwrap();
    assert_eq!(codes(active), vec!["B-B1"]);

    assert!(
        repo.list_nodes(&WarehouseId::new(), &LocationFilter::all())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_updates_on_missing_node() {
    let repo = InMemoryLocationRepository::new();
    let missing = LocationId::new();
    assert_eq!(
        repo.set_active(&missing, false, None).await.unwrap_err().tag(),
        "NOT_FOUND"
    );
    assert_eq!(
        repo.update_description(&missing, None, None)
            .await
            .unwrap_err()
            .tag(),
        "NOT_FOUND"
    );
    assert!(repo.get_node(&missing).await.unwrap().is_none());
}
