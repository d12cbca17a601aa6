use glam::Vec3;

/// Axis-aligned box accumulated from points.
///
/// An empty box has `min = +inf` and `max = -inf` so the first point sets
/// both corners. Inputs with fewer than three components leave the missing
/// coordinates at zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn add_point(&mut self, p: impl Into<Vec3>) {
        let p = p.into();
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn add_points(&mut self, points: &[[f32; 3]]) {
        for p in points {
            self.add_point(*p);
        }
    }

    /// Adds every vertex of a flat `stride`-component array.
    pub fn add_flat(&mut self, data: &[f32], stride: usize) {
        if stride == 0 {
            return;
        }
        for v in data.chunks_exact(stride) {
            let mut p = [0.0; 3];
            let n = stride.min(3);
            p[..n].copy_from_slice(&v[..n]);
            self.add_point(p);
        }
    }

    pub fn merge(&mut self, other: &BoundingBox) {
        if !other.is_empty() {
            self.add_point(other.min);
            self.add_point(other.max);
        }
    }

    pub fn min(&self) -> Option<Vec3> {
        (!self.is_empty()).then_some(self.min)
    }

    pub fn max(&self) -> Option<Vec3> {
        (!self.is_empty()).then_some(self.max)
    }

    /// Midpoint of the box, `None` when nothing was added.
    pub fn center(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| (self.min + self.max) * 0.5)
    }

    pub fn extent(&self) -> Option<Vec3> {
        (!self.is_empty()).then(|| self.max - self.min)
    }
}
