//! Colour model for lookup textures.
//!
//! Scope:
//! - straight RGB colours in [0, 1] with HSV construction
//! - colour-stop gradients sampled into texel rows

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{ColorStop, Gradient};
