use std::rc::Rc;

use crate::device::GraphicsContext;
use crate::error::Result;
use crate::names;
use crate::paint::Gradient;
use crate::texture::{SharedTexture, Texture1D, MAX_TEXELS};
use crate::uniform::{shared, SharedUniform, Uniform};

use super::ColorMap;

pub const HISTOGRAM_BINS: usize = 100;

/// Continuous colour ramp over a value range.
///
/// Owns the `u_value_min`/`u_value_max` uniforms that painters observe, and
/// keeps a normalised histogram of the last values for plotting.
#[derive(Debug)]
pub struct GradientColorMap {
    texture: SharedTexture,
    gradient: Gradient,
    value_min: SharedUniform,
    value_max: SharedUniform,
    values: Vec<f32>,
    histogram: Vec<f32>,
}

impl Default for GradientColorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl GradientColorMap {
    pub fn new() -> Self {
        Self {
            texture: Texture1D::linear().into_shared(),
            gradient: Gradient::default(),
            value_min: shared(Uniform::float(names::U_VALUE_MIN, 0.0)),
            value_max: shared(Uniform::float(names::U_VALUE_MAX, 0.0)),
            values: Vec::new(),
            histogram: vec![0.0; HISTOGRAM_BINS],
        }
    }

    pub fn texture(&self) -> &SharedTexture {
        &self.texture
    }

    pub fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    /// Replaces the ramp; call [`sync`](Self::sync) to upload it.
    pub fn set_gradient(&mut self, gradient: Gradient) {
        self.gradient = gradient;
    }

    pub fn value_min(&self) -> &SharedUniform {
        &self.value_min
    }

    pub fn value_max(&self) -> &SharedUniform {
        &self.value_max
    }

    /// Current `(min, max)` of the mapped range.
    pub fn range(&self) -> (f32, f32) {
        let get = |u: &SharedUniform| u.borrow().as_float().unwrap_or(0.0);
        (get(&self.value_min), get(&self.value_max))
    }

    /// Takes new data: the range is reset to its extent and the histogram
    /// recomputed. Non-finite values are ignored; an empty set changes
    /// nothing.
    pub fn set_values(&mut self, values: &[f32]) {
        let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let Some((min, max)) = finite.iter().fold(None, |acc: Option<(f32, f32)>, v| {
            Some(acc.map_or((*v, *v), |(lo, hi)| (lo.min(*v), hi.max(*v))))
        }) else {
            return;
        };
        self.values = finite;
        self.set_range(min, max);
    }

    /// Narrows or widens the mapped range and rebins the histogram over it.
    pub fn set_range(&mut self, min: f32, max: f32) {
        self.value_min.borrow_mut().set_float(min);
        self.value_max.borrow_mut().set_float(max);
        self.histogram = histogram(&self.values, min, max, HISTOGRAM_BINS);
    }

    /// Bin heights normalised to the tallest bin.
    pub fn histogram(&self) -> &[f32] {
        &self.histogram
    }

    /// Initialises the texture if needed and uploads the sampled ramp.
    pub fn sync(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        let texels = self.gradient.texels(MAX_TEXELS);
        let mut texture = self.texture.borrow_mut();
        texture.init(ctx)?;
        texture.set_data(ctx, &texels, MAX_TEXELS)?;
        log::debug!("gradient colour map uploaded (range {:?})", self.range());
        Ok(())
    }

    pub fn colormap(&self) -> ColorMap {
        ColorMap::Gradient {
            texture: Rc::downgrade(&self.texture),
            value_min: Rc::downgrade(&self.value_min),
            value_max: Rc::downgrade(&self.value_max),
        }
    }
}

/// Counts `values` into `bins` equal-width bins spanning `min..=max`, then
/// scales so the tallest bin is 1. Values outside the range are dropped.
fn histogram(values: &[f32], min: f32, max: f32, bins: usize) -> Vec<f32> {
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return Vec::new();
    }
    let span = max - min;
    for v in values {
        if *v < min || *v > max {
            continue;
        }
        let bin = if span > 0.0 {
            (((v - min) / span) * (bins - 1) as f32).floor() as usize
        } else {
            0
        };
        counts[bin.min(bins - 1)] += 1;
    }
    let peak = counts.iter().copied().max().unwrap_or(0);
    if peak == 0 {
        return vec![0.0; bins];
    }
    counts.iter().map(|c| *c as f32 / peak as f32).collect()
}
