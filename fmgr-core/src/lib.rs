//! fmgr Core
//!
//! Core library for a schema-driven resource provider that maps resource data
//! onto the nested JSON objects of a device management API

pub mod case;
pub mod convert;
pub mod diff;
pub mod provider;
pub mod resource;
pub mod schema;
