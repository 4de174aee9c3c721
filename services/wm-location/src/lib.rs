//! wm-location - 仓库库位层级服务
//!
//! 区 → 巷道 → 货位三级库位树：手工构建、布局编译、级联选择与树形展示

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// 引入生成的 proto 代码
pub mod wm_location {
    pub mod v1 {
        tonic::include_proto!("wm.location.v1");
    }
}

pub use wm_location::v1 as proto;

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("wm_location_descriptor");
