/// Straight (non-premultiplied) RGB colour, channels in [0, 1].
///
/// Lookup textures carry no alpha, so there is nothing to premultiply.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Converts hue/saturation/value, all in [0, 1]. Hue wraps.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        if s <= 0.0 {
            return Self::rgb(v, v, v);
        }

        let h = h.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        match sector as u32 {
            0 => Self::rgb(v, t, p),
            1 => Self::rgb(q, v, p),
            2 => Self::rgb(p, v, t),
            3 => Self::rgb(p, q, v),
            4 => Self::rgb(t, p, v),
            _ => Self::rgb(v, p, q),
        }
    }

    /// Component-wise linear interpolation.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self::rgb(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// 8-bit RGB texel.
    #[inline]
    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primaries() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0).to_u8(), [255, 0, 0]);
        assert_eq!(Color::from_hsv(1.0 / 3.0, 1.0, 1.0).to_u8(), [0, 255, 0]);
        assert_eq!(Color::from_hsv(2.0 / 3.0, 1.0, 1.0).to_u8(), [0, 0, 255]);
        assert_eq!(Color::from_hsv(1.0, 1.0, 1.0).to_u8(), [255, 0, 0]);
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(Color::from_hsv(0.4, 0.0, 0.5), Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn u8_round_trip_clamps() {
        assert_eq!(Color::rgb(1.5, -0.2, 0.5).to_u8(), [255, 0, 128]);
        assert_eq!(Color::from_u8(255, 0, 0), Color::rgb(1.0, 0.0, 0.0));
    }
}
