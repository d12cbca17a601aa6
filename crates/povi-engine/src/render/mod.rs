//! Painters.
//!
//! Painters turn attribute buffers, a shader and a few uniforms into draw
//! calls through a [`GraphicsContext`](crate::device::GraphicsContext).
//! Each painter owns its GPU objects and creates them lazily on first render.
//!
//! Convention:
//! - positions are world-space xyz, transformed by `u_mvp` in the shader
//! - the HUD crosshair is the exception and draws directly in clip space

mod config;
mod crosshair;
mod ctx;
mod host;
mod painter;

pub use config::PainterConfig;
pub use crosshair::CrosshairPainter;
pub use ctx::FrameMatrices;
pub use host::AttributeHost;
pub use painter::{builtin_uniforms, Painter, PainterSummary, SubRange};
