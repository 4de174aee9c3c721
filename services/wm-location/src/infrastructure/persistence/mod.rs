//! Persistence implementations

mod converters;
mod memory;
mod migrations;
mod postgres;
mod rows;

pub use memory::{InMemoryLayoutRepository, InMemoryLocationRepository};
pub use migrations::migrations;
pub use postgres::{PostgresLayoutRepository, PostgresLocationRepository};
