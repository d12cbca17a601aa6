//! Colour map producers.
//!
//! A producer owns a lookup texture (and, for gradients, the value-range
//! uniforms) and hands painters a [`ColorMap`] of weak handles. Dropping the
//! producer turns every painter's reference into a silent no-op.

mod categorical;
mod gradient;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Weak;

use crate::texture::{Texture1D, MAX_TEXELS};
use crate::uniform::Uniform;

pub use categorical::CategoricalColorMap;
pub use gradient::{GradientColorMap, HISTOGRAM_BINS};

/// Weak view of a producer's resources, applied with
/// [`Painter::apply_colormap`](crate::render::Painter::apply_colormap).
#[derive(Debug, Clone)]
pub enum ColorMap {
    /// Integer categories, each assigned one texel.
    Categorical {
        texture: Weak<RefCell<Texture1D>>,
        mapping: BTreeMap<i32, usize>,
    },
    /// Continuous values normalised by `u_value_min`/`u_value_max`.
    Gradient {
        texture: Weak<RefCell<Texture1D>>,
        value_min: Weak<RefCell<Uniform>>,
        value_max: Weak<RefCell<Uniform>>,
    },
}

impl ColorMap {
    pub fn texture(&self) -> &Weak<RefCell<Texture1D>> {
        match self {
            ColorMap::Categorical { texture, .. } | ColorMap::Gradient { texture, .. } => texture,
        }
    }

    #[inline]
    pub fn is_gradient(&self) -> bool {
        matches!(self, ColorMap::Gradient { .. })
    }

    /// Texture coordinate `slot / 256` for each identifier. Unknown values and
    /// gradient maps yield 0.
    pub fn map_identifiers(&self, identifiers: &[i32]) -> Vec<f32> {
        let ColorMap::Categorical { mapping, .. } = self else {
            return vec![0.0; identifiers.len()];
        };
        identifiers
            .iter()
            .map(|id| mapping.get(id).copied().unwrap_or(0) as f32 / MAX_TEXELS as f32)
            .collect()
    }
}
