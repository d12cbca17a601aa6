use crate::device::GraphicsContext;
use crate::error::Result;
use crate::render::FrameMatrices;

/// Something the host can draw once per frame.
pub trait Drawable {
    /// Allocates GPU objects. Idempotent; `render` calls it lazily.
    fn init(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()>;

    fn is_initialised(&self) -> bool;

    /// Issues this drawable's draw calls. Never fails: problems are logged
    /// and the frame is skipped for this drawable.
    fn render(&mut self, ctx: &mut dyn GraphicsContext, frame: &FrameMatrices);

    /// Deletes GPU objects owned by the drawable.
    fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        let _ = ctx;
    }
}
