use crate::device::{DrawMode, PolygonMode};

/// Construction parameters for a [`Painter`](super::Painter).
#[derive(Debug, Clone, PartialEq)]
pub struct PainterConfig {
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub draw_mode: DrawMode,
    pub polygon_mode: PolygonMode,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            vertex_shader: "basic.vert".to_string(),
            fragment_shader: "basic.frag".to_string(),
            draw_mode: DrawMode::Triangles,
            polygon_mode: PolygonMode::Fill,
        }
    }
}
