//! 值对象模块

mod depth;
mod ids;
mod label;
mod level_option;

pub use depth::LocationDepth;
pub use ids::{LocationId, WarehouseId};
pub use label::{
    LabelError, LocationLabel, MAX_LABEL_LEN, PATH_SEPARATOR, ZONE_CODE_PREFIX, check_zone_label,
    child_path, preview_child_code, preview_zone_code, split_path, strip_label_prefix, zone_code,
};
pub use level_option::LevelOption;
