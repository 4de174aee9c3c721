//! 应用层

pub mod builder;
pub mod catalog;
pub mod commands;
pub mod compiler;
pub mod handler;
pub mod maintenance;
mod metrics;
pub mod queries;
pub mod resolver;
pub mod tree;

pub use builder::HierarchyBuilder;
pub use catalog::{LocationCatalog, retain_effectively_active};
pub use commands::*;
pub use compiler::{CompileReport, LayoutCompiler, SkipReason, SkippedRect};
pub use handler::ServiceHandler;
pub use maintenance::LocationMaintenance;
pub use queries::*;
pub use resolver::LocationResolver;
pub use tree::{FlatNode, TreeNode, build_tree, count_nodes, flatten, render_tree};
