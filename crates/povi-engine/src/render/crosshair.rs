use std::rc::Rc;

use crate::core::Drawable;
use crate::device::{DrawMode, GraphicsContext};
use crate::error::Result;
use crate::names::AttributeName;
use crate::shader::{ShaderProgram, ShaderSourceLoader};

use super::{AttributeHost, FrameMatrices};

/// Two clip-space line segments through the screen centre.
const CROSSHAIR: [f32; 8] = [-1.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 1.0];
const CROSSHAIR_STRIDE: usize = 2;

/// Screen-centre crosshair overlay.
///
/// Draws in clip space and ignores the camera, so it needs nothing beyond
/// its own shader and one position buffer.
#[derive(Debug)]
pub struct CrosshairPainter {
    host: AttributeHost,
    initialised: bool,
}

impl CrosshairPainter {
    pub fn new(loader: Rc<dyn ShaderSourceLoader>) -> Self {
        let shader = ShaderProgram::with_sources(loader, ["crosshair.vert", "crosshair.frag"]);
        Self {
            host: AttributeHost::new(shader.into_shared(), &[AttributeName::Position]),
            initialised: false,
        }
    }

    pub fn host(&self) -> &AttributeHost {
        &self.host
    }
}

impl Drawable for CrosshairPainter {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        if self.initialised {
            return Ok(());
        }
        {
            let mut shader = self.host.shader().borrow_mut();
            if shader.needs_init() {
                shader.init(ctx)?;
            }
        }
        self.host.init(ctx)?;
        let vertices = CROSSHAIR.len() / CROSSHAIR_STRIDE;
        self.host
            .set_attribute(ctx, AttributeName::Position, &CROSSHAIR, vertices, CROSSHAIR_STRIDE)?;
        self.initialised = true;
        Ok(())
    }

    fn is_initialised(&self) -> bool {
        self.initialised
    }

    fn render(&mut self, ctx: &mut dyn GraphicsContext, _frame: &FrameMatrices) {
        if let Err(e) = self.init(ctx) {
            log::debug!("crosshair skipped: {e}");
            return;
        }
        if let Err(e) = self.host.sync(ctx) {
            log::debug!("crosshair skipped: {e}");
            return;
        }
        if !self.host.shader().borrow().activate(ctx) {
            return;
        }
        let Some(vao) = self.host.vertex_array() else { return };
        let count = self
            .host
            .buffer(AttributeName::Position)
            .map_or(0, |b| b.length());
        ctx.draw_arrays(vao, DrawMode::Lines, 0, count);
    }

    fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        self.host.release(ctx);
        self.initialised = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GlCall, RecordingContext};
    use crate::shader::MemoryLoader;

    #[test]
    fn draws_two_segments_as_lines() {
        let mut ctx = RecordingContext::new();
        let mut hud = CrosshairPainter::new(Rc::new(MemoryLoader::builtin()));
        hud.render(&mut ctx, &FrameMatrices::default());

        assert!(hud.is_initialised());
        assert_eq!(ctx.draw_calls(), vec![(DrawMode::Lines, 0, 4)]);
        assert!(ctx.calls().iter().any(|c| matches!(
            c,
            GlCall::VertexAttributePointer { components: 2, stride_bytes: 8, .. }
        )));
        assert!(ctx.uniform_binds().is_empty());
    }

    #[test]
    fn missing_shader_skips_quietly() {
        let mut ctx = RecordingContext::new();
        let mut hud = CrosshairPainter::new(Rc::new(MemoryLoader::new()));
        hud.render(&mut ctx, &FrameMatrices::default());
        assert!(!hud.is_initialised());
        assert!(ctx.draw_calls().is_empty());
    }
}
