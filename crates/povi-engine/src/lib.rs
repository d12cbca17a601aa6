//! Povi engine crate.
//!
//! This crate owns the GPU resource and draw-dispatch pieces of the viewer:
//! shader programs, attribute buffers, 1-D colour textures, uniforms and the
//! painters that turn geometry collections into draw calls. Everything talks
//! to the GPU through [`device::GraphicsContext`] so the same code drives a
//! real GL context or the in-memory recorder used by tests and tooling.

pub mod device;
pub mod error;
pub mod logging;

pub mod buffer;
pub mod colormap;
pub mod coords;
pub mod core;
pub mod geometry;
pub mod names;
pub mod paint;
pub mod render;
pub mod shader;
pub mod texture;
pub mod uniform;

pub use error::{GlooError, Result};
