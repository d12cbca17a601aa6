use std::collections::BTreeMap;
use std::rc::Rc;

use rand::Rng;

use crate::device::GraphicsContext;
use crate::error::Result;
use crate::paint::Color;
use crate::texture::{SharedTexture, Texture1D, MAX_TEXELS};

use super::ColorMap;

/// One colour per distinct integer value.
///
/// Values are counted across calls to [`count_values`](Self::count_values)
/// and assigned texture slots in ascending order. Slots past 255 clamp to
/// the last texel when sampled.
#[derive(Debug)]
pub struct CategoricalColorMap {
    texture: SharedTexture,
    colors: Vec<Color>,
    value_counts: BTreeMap<i32, usize>,
}

impl Default for CategoricalColorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoricalColorMap {
    pub fn new() -> Self {
        Self {
            texture: Texture1D::nearest().into_shared(),
            colors: vec![Color::BLACK; MAX_TEXELS],
            value_counts: BTreeMap::new(),
        }
    }

    pub fn texture(&self) -> &SharedTexture {
        &self.texture
    }

    // ── values ──

    pub fn count_values(&mut self, values: &[i32]) {
        for v in values {
            *self.value_counts.entry(*v).or_insert(0) += 1;
        }
        if self.value_counts.len() > MAX_TEXELS {
            log::warn!(
                "{} distinct values exceed the {MAX_TEXELS} colour slots",
                self.value_counts.len()
            );
        }
    }

    pub fn reset_counts(&mut self) {
        self.value_counts.clear();
    }

    /// Occurrences per distinct value, ascending by value.
    pub fn value_counts(&self) -> &BTreeMap<i32, usize> {
        &self.value_counts
    }

    /// Slot per distinct value, ascending by value.
    pub fn mapping(&self) -> BTreeMap<i32, usize> {
        self.value_counts
            .keys()
            .enumerate()
            .map(|(slot, value)| (*value, slot))
            .collect()
    }

    // ── colours ──

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn set_color(&mut self, slot: usize, color: Color) -> bool {
        match self.colors.get_mut(slot) {
            Some(c) => {
                *c = color;
                true
            }
            None => false,
        }
    }

    /// Fully saturated colours with random hues.
    pub fn randomize_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for c in &mut self.colors {
            *c = Color::from_hsv(rng.gen_range(0.0..1.0), 1.0, 1.0);
        }
    }

    pub fn texels(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_u8()).collect()
    }

    /// Initialises the texture if needed and uploads the current colours.
    pub fn sync(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        let texels = self.texels();
        let mut texture = self.texture.borrow_mut();
        texture.init(ctx)?;
        texture.set_data(ctx, &texels, MAX_TEXELS)?;
        log::debug!("categorical colour map uploaded ({} values)", self.value_counts.len());
        Ok(())
    }

    pub fn colormap(&self) -> ColorMap {
        ColorMap::Categorical {
            texture: Rc::downgrade(&self.texture),
            mapping: self.mapping(),
        }
    }
}
