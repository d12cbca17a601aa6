//! Coordinate types shared across painters.
//!
//! World space is whatever the geometry source provides; painters only
//! track extents in it. Camera transforms arrive as `glam` matrices.

mod bounding_box;

pub use bounding_box::BoundingBox;
