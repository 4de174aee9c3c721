//! 仓储接口模块

mod layout_repository;
mod location_repository;

pub use layout_repository::LayoutRepository;
pub use location_repository::{LocationFilter, LocationRepository};
