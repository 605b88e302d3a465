//! Device API resource schema definitions

pub mod generated;

pub use generated::{ResourceDefinition, definitions};
