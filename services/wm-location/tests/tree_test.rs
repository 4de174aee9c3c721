//! 树形展示测试

mod support;

use common::AuditInfo;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use support::Fixture;
use wm_location::application::*;
use wm_location::domain::entities::LocationNode;
use wm_location::domain::repositories::{LocationFilter, LocationRepository};
use wm_location::domain::value_objects::{LocationDepth, LocationId, LocationLabel, WarehouseId};

async fn populated() -> Fixture {
    let fx = Fixture::new();
    let b = fx.zone("B").await;
    let a = fx.zone("A").await;
    fx.aisle(*a.id(), "A2", 2).await;
    fx.aisle(*a.id(), "A1", 2).await;
    fx.aisle(*b.id(), "B1", 1).await;
    fx
}

async fn tree(fx: &Fixture, include_inactive: bool) -> Vec<TreeNode> {
    fx.handler
        .get_location_tree(GetLocationTreeQuery {
            warehouse_id: fx.warehouse_id,
            include_inactive,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_tree_is_sorted_by_code() {
    let fx = populated().await;
    let forest = tree(&fx, true).await;

    assert_eq!(count_nodes(&forest), 9);
    assert_eq!(
        render_tree(&forest),
        "ZONE-A (zone)\n\
         \x20 A-A1 (aisle)\n\
         \x20   A-A1-L1 (bin)\n\
         \x20   A-A1-L2 (bin)\n\
         \x20 A-A2 (aisle)\n\
         \x20   A-A2-L1 (bin)\n\
         \x20   A-A2-L2 (bin)\n\
         ZONE-B (zone)\n\
         \x20 B-B1 (aisle)\n"
    );
}

#[tokio::test]
async fn test_input_order_does_not_matter() {
    let fx = populated().await;
    let nodes = fx
        .locations
        .list_nodes(&fx.warehouse_id, &LocationFilter::all())
        .await
        .unwrap();
    let expected = render_tree(&build_tree(nodes.clone()));

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let mut shuffled = nodes.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(render_tree(&build_tree(shuffled)), expected);
    }
}

#[tokio::test]
async fn test_inactive_subtrees_are_hidden() {
    let fx = populated().await;
    let a2 = fx
        .handler
        .list_locations(ListLocationsQuery {
            warehouse_id: fx.warehouse_id,
            filter: LocationFilter::all().depth(LocationDepth::Aisle).zone("a").aisle("a2"),
        })
        .await
        .unwrap()
        .remove(0);
    fx.deactivate(*a2.id()).await;

    let active = tree(&fx, false).await;
    assert_eq!(count_nodes(&active), 6);
    assert!(flatten(&active).iter().all(|f| !f.node.code().starts_with("A-A2")));

    let everything = tree(&fx, true).await;
    assert_eq!(count_nodes(&everything), 9);
    assert!(render_tree(&everything).contains("  A-A2 (aisle) [inactive]\n"));
}

fn detached(id: LocationId, label: &str, parent_id: Option<LocationId>) -> LocationNode {
    let zone = LocationLabel::parse(label).unwrap();
    LocationNode::from_parts(
        id,
        WarehouseId::new(),
        parent_id,
        LocationDepth::Zone,
        format!("ZONE-{}", zone),
        zone.to_string(),
        zone,
        None,
        None,
        true,
        None,
        AuditInfo::new(None),
    )
}

#[test]
fn test_orphans_become_roots() {
    let orphan = detached(LocationId::new(), "A", Some(LocationId::new()));
    let forest = build_tree(vec![orphan]);
    assert_eq!(forest.len(), 1);
    assert!(forest[0].children.is_empty());
}

#[test]
fn test_cycles_do_not_lose_nodes() {
    let first = LocationId::new();
    let second = LocationId::new();
    let a = detached(first, "A", Some(second));
    let b = detached(second, "B", Some(first));

    let forest = build_tree(vec![a, b]);
    assert_eq!(count_nodes(&forest), 2);
    assert_eq!(flatten(&forest).len(), 2);
}
