use std::path::Path;

/// Primitive assembly mode used for a draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    Triangles,
    LineStrip,
    LineLoop,
}

impl DrawMode {
    /// All modes, in the order the editor lists them.
    pub const ALL: [DrawMode; 5] = [
        DrawMode::Points,
        DrawMode::Lines,
        DrawMode::Triangles,
        DrawMode::LineStrip,
        DrawMode::LineLoop,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DrawMode::Points => "GL_POINTS",
            DrawMode::Lines => "GL_LINES",
            DrawMode::Triangles => "GL_TRIANGLES",
            DrawMode::LineStrip => "GL_LINE_STRIP",
            DrawMode::LineLoop => "GL_LINE_LOOP",
        }
    }
}

/// Rasterization mode for triangles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PolygonMode {
    Point,
    Line,
    #[default]
    Fill,
}

impl PolygonMode {
    pub const ALL: [PolygonMode; 3] = [PolygonMode::Point, PolygonMode::Line, PolygonMode::Fill];

    pub fn label(self) -> &'static str {
        match self {
            PolygonMode::Point => "GL_POINT",
            PolygonMode::Line => "GL_LINE",
            PolygonMode::Fill => "GL_FILL",
        }
    }
}

/// Texture sampling filter (min and mag use the same value).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextureFilter {
    #[default]
    Nearest,
    Linear,
}

/// Programmable pipeline stage of a shader source.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
}

impl ShaderStage {
    /// Infers the stage from a source identifier's extension.
    ///
    /// `.vert`, `.frag` and `.geom` are recognised; anything else is `None`.
    pub fn from_source_id(source_id: &str) -> Option<Self> {
        match Path::new(source_id).extension()?.to_str()? {
            "vert" => Some(ShaderStage::Vertex),
            "frag" => Some(ShaderStage::Fragment),
            "geom" => Some(ShaderStage::Geometry),
            _ => None,
        }
    }
}
