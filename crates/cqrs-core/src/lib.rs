//! cqrs-core - CQRS 核心库
//!
//! Command/Query trait 与对应的 Handler trait

mod command;
mod query;

pub use command::*;
pub use query::*;
