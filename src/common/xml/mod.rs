//! XML text helpers shared by the package readers.

mod entity;

pub use entity::{push_entity, resolve_entity};
