use super::Color;

/// A single gradient stop.
///
/// `t` is expected in [0, 1]; [`Gradient::new`] sorts stops by it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Piecewise-linear colour ramp over [0, 1], clamped at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Default for Gradient {
    /// Black to white.
    fn default() -> Self {
        Self::new(vec![
            ColorStop::new(0.0, Color::BLACK),
            ColorStop::new(1.0, Color::WHITE),
        ])
    }
}

impl Gradient {
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        stops.retain(|s| s.t.is_finite() && s.color.is_finite());
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { stops }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Returns true when the gradient has at least two stops.
    pub fn is_valid(&self) -> bool {
        self.stops.len() >= 2
    }

    /// Colour at `t`. An empty gradient is black.
    pub fn sample(&self, t: f32) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::BLACK;
        };
        if t <= first.t {
            return first.color;
        }
        if t >= last.t {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                let f = if span > 0.0 { (t - a.t) / span } else { 1.0 };
                return a.color.lerp(b.color, f);
            }
        }
        last.color
    }

    /// `width` RGB texels sampled at texel centres.
    pub fn texels(&self, width: usize) -> Vec<u8> {
        (0..width)
            .flat_map(|i| self.sample((i as f32 + 0.5) / width as f32).to_u8())
            .collect()
    }
}
