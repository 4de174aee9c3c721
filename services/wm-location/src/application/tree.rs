//! 树形展示
//!
//! 把扁平节点列表组装成按编码排序的森林。父节点不在输入中的节点视为根；
//! 损坏数据形成的环上的节点也会被提升为根，不丢失任何节点。

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write;

use serde::Serialize;

use crate::domain::entities::LocationNode;
use crate::domain::value_objects::LocationId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub node: LocationNode,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// 以本节点为根的子树节点数
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// 深度优先展开后的选择项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatNode<'a> {
    /// 在树中的缩进层级，根为 0
    pub indent: usize,
    pub node: &'a LocationNode,
}

fn by_code(a: &LocationNode, b: &LocationNode) -> Ordering {
    a.code().cmp(b.code()).then_with(|| a.id().cmp(b.id()))
}

pub fn build_tree(nodes: Vec<LocationNode>) -> Vec<TreeNode> {
    let mut index: HashMap<LocationId, LocationNode> =
        nodes.into_iter().map(|n| (*n.id(), n)).collect();

    let mut order: Vec<&LocationNode> = index.values().collect();
    order.sort_by(|a, b| by_code(a, b));

    let mut root_ids = Vec::new();
    let mut children: HashMap<LocationId, Vec<LocationId>> = HashMap::new();
    for node in &order {
        match node.parent_id().filter(|p| index.contains_key(*p)) {
            Some(parent) => children.entry(*parent).or_default().push(*node.id()),
            None => root_ids.push(*node.id()),
        }
    }
    let order: Vec<LocationId> = order.into_iter().map(|n| *n.id()).collect();

    let mut roots: Vec<TreeNode> = root_ids
        .into_iter()
        .filter_map(|id| attach(id, &mut index, &children))
        .collect();

    // 剩余节点只可能位于环上
    for id in order {
        if let Some(tree) = attach(id, &mut index, &children) {
            roots.push(tree);
        }
    }
    roots.sort_by(|a, b| by_code(&a.node, &b.node));
    roots
}

fn attach(
    id: LocationId,
    index: &mut HashMap<LocationId, LocationNode>,
    children: &HashMap<LocationId, Vec<LocationId>>,
) -> Option<TreeNode> {
    let node = index.remove(&id)?;
    let kids = children
        .get(&id)
        .map(|ids| {
            ids.iter()
                .filter_map(|child| attach(*child, index, children))
                .collect()
        })
        .unwrap_or_default();
    Some(TreeNode {
        node,
        children: kids,
    })
}

pub fn count_nodes(forest: &[TreeNode]) -> usize {
    forest.iter().map(TreeNode::size).sum()
}

/// 深度优先展开为带缩进的选择列表
pub fn flatten(forest: &[TreeNode]) -> Vec<FlatNode<'_>> {
    fn walk<'a>(trees: &'a [TreeNode], indent: usize, out: &mut Vec<FlatNode<'a>>) {
        for tree in trees {
            out.push(FlatNode {
                indent,
                node: &tree.node,
            });
            walk(&tree.children, indent + 1, out);
        }
    }

    let mut out = Vec::with_capacity(count_nodes(forest));
    walk(forest, 0, &mut out);
    out
}

/// 缩进文本，停用节点带 `[inactive]` 标记
pub fn render_tree(forest: &[TreeNode]) -> String {
    let mut out = String::new();
    for entry in flatten(forest) {
        let node = entry.node;
        let _ = write!(out, "{}{} ({})", "  ".repeat(entry.indent), node.code(), node.depth());
        if !node.is_active() {
            out.push_str(" [inactive]");
        }
        if let Some(description) = node.description() {
            let _ = write!(out, " - {}", description);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewLocation;
    use crate::domain::value_objects::{LocationLabel, WarehouseId};

    fn label(raw: &str) -> LocationLabel {
        LocationLabel::parse(raw).unwrap()
    }

    #[test]
    fn test_render_marks_inactive_and_description() {
        let wh = WarehouseId::new();
        let zone = LocationNode::derive(
            &NewLocation::zone(wh, label("a")).with_description(Some("ambient".to_string())),
            None,
        )
        .unwrap();
        let mut aisle =
            LocationNode::derive(&NewLocation::aisle(wh, *zone.id(), label("a1")), Some(&zone))
                .unwrap();
        aisle.set_active(false, None);

        let forest = build_tree(vec![aisle, zone]);
        assert_eq!(
            render_tree(&forest),
            "ZONE-A (zone) - ambient\n  A-A1 (aisle) [inactive]\n"
        );
        assert_eq!(count_nodes(&forest), 2);

        let flat = flatten(&forest);
        assert_eq!(flat[0].indent, 0);
        assert_eq!(flat[1].indent, 1);
        assert_eq!(flat[1].node.code(), "A-A1");
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(Vec::new()).is_empty());
        assert_eq!(render_tree(&[]), "");
    }
}
