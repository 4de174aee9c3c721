//! 实体模块

mod layout;
mod location_node;

pub use layout::{LayoutRect, RectKind, WarehouseLayout};
pub use location_node::{LocationNode, NewLocation};
