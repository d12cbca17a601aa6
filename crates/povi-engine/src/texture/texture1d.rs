use std::cell::RefCell;
use std::rc::Rc;

use crate::device::{GraphicsContext, TextureFilter, TextureId};
use crate::error::{GlooError, Result};

/// Texels in a colour map texture.
pub const MAX_TEXELS: usize = 256;
pub const BYTES_PER_TEXEL: usize = 3;

pub type SharedTexture = Rc<RefCell<Texture1D>>;

/// A 1-D RGB8 texture bound to unit 0 with clamp-to-edge wrapping.
///
/// The filter is chosen at construction and applied every time the texture
/// is activated.
#[derive(Debug)]
pub struct Texture1D {
    texture: Option<TextureId>,
    filter: TextureFilter,
    width: usize,
}

impl Texture1D {
    pub fn new(filter: TextureFilter) -> Self {
        Self {
            texture: None,
            filter,
            width: 0,
        }
    }

    pub fn nearest() -> Self {
        Self::new(TextureFilter::Nearest)
    }

    pub fn linear() -> Self {
        Self::new(TextureFilter::Linear)
    }

    pub fn into_shared(self) -> SharedTexture {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn is_initialised(&self) -> bool {
        self.texture.is_some()
    }

    pub fn id(&self) -> Option<TextureId> {
        self.texture
    }

    /// Creates the GPU object and binds it once with its sampling state.
    /// Idempotent.
    pub fn init(&mut self, ctx: &mut dyn GraphicsContext) -> Result<TextureId> {
        if let Some(texture) = self.texture {
            return Ok(texture);
        }
        let texture = ctx.create_texture()?;
        self.texture = Some(texture);
        self.activate(ctx);
        Ok(texture)
    }

    /// Binds to unit 0. No-op before `init`.
    pub fn activate(&self, ctx: &mut dyn GraphicsContext) {
        if let Some(texture) = self.texture {
            ctx.bind_texture_1d(Some(texture), self.filter);
        }
    }

    pub fn deactivate(&self, ctx: &mut dyn GraphicsContext) {
        ctx.bind_texture_1d(None, self.filter);
    }

    /// Uploads `width` RGB texels from `rgb`.
    ///
    /// Before `init` this does nothing: the owner pushes data again when it
    /// next syncs.
    pub fn set_data(&mut self, ctx: &mut dyn GraphicsContext, rgb: &[u8], width: usize) -> Result<()> {
        let Some(texture) = self.texture else {
            log::debug!("texture data dropped: texture not initialised");
            return Ok(());
        };
        let expected = width * BYTES_PER_TEXEL;
        if rgb.len() < expected {
            return Err(GlooError::TextureDataMismatch {
                expected,
                actual: rgb.len(),
                width,
            });
        }
        if width > MAX_TEXELS {
            log::warn!("uploading {width} texels; colour maps address at most {MAX_TEXELS}");
        }
        ctx.upload_texture_1d(texture, width, &rgb[..expected]);
        self.width = width;
        Ok(())
    }

    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(texture) = self.texture.take() {
            ctx.delete_texture(texture);
        }
        self.width = 0;
    }
}
