//! Named shader parameters.
//!
//! A [`Uniform`] pairs a GLSL name with a typed value. Painters own their
//! built-in uniforms by value and reference external ones through
//! [`SharedUniform`] handles owned by whoever produced them (e.g. a colour map).

mod value;

pub use value::{shared, SharedUniform, Uniform, UniformKind, UniformValue};
