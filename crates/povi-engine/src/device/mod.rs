//! GPU context abstraction.
//!
//! This module is responsible for:
//! - the typed object handles (programs, shaders, buffers, vertex arrays, textures)
//! - the small GL vocabulary used by painters (draw/polygon modes, filters, stages)
//! - the [`GraphicsContext`] trait every resource call goes through
//! - two implementations: [`GlowContext`] over a live GL context and
//!   [`RecordingContext`] which records calls in memory

mod context;
#[cfg(not(target_arch = "wasm32"))]
mod gl;
mod ids;
mod recording;
mod vocab;

pub use context::GraphicsContext;
#[cfg(not(target_arch = "wasm32"))]
pub use gl::GlowContext;
pub use ids::{BufferId, ProgramId, ShaderId, TextureId, UniformLocation, VertexArrayId};
pub use recording::{GlCall, RecordingContext};
pub use vocab::{DrawMode, PolygonMode, ShaderStage, TextureFilter};
