//! One-dimensional RGB lookup textures used for colour mapping.

mod texture1d;

pub use texture1d::{SharedTexture, Texture1D, BYTES_PER_TEXEL, MAX_TEXELS};
