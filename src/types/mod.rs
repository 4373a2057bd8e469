//! Core types for the enclosure tree.

pub mod color;
pub mod bbox;
pub mod grid;
pub mod region;

pub use color::ColorClass;
pub use bbox::BoundingBox;
pub use grid::{BinaryGrid, GridError};
pub use region::{Region, RegionId, RegionStats};
