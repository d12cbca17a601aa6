use glam::{Mat3, Mat4};

/// Camera transforms for one draw.
///
/// This is intentionally small and stable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for FrameMatrices {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl FrameMatrices {
    #[inline]
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model,
            view,
            projection,
        }
    }

    #[inline]
    pub fn model_view(&self) -> Mat4 {
        self.view * self.model
    }

    #[inline]
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    /// Inverse-transpose of the upper 3x3 of model-view, for normals.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model_view()).inverse().transpose()
    }
}
