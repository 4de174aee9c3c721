//! 领域层
//!
//! 库位节点、布局、值对象与仓储接口

pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
