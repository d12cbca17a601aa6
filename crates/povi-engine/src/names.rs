//! Attribute and uniform names shared between painters and shader sources.
//!
//! Shaders are free to omit any of these; a missing binding is reported once
//! and otherwise ignored.

/// Per-vertex attribute slots a painter can feed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum AttributeName {
    Position,
    Normal,
    Value,
    Identifier,
}

impl AttributeName {
    pub const ALL: [AttributeName; 4] = [
        AttributeName::Position,
        AttributeName::Normal,
        AttributeName::Value,
        AttributeName::Identifier,
    ];

    /// GLSL input name.
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeName::Position => "position",
            AttributeName::Normal => "normal",
            AttributeName::Value => "value",
            AttributeName::Identifier => "identifier",
        }
    }
}

impl std::fmt::Display for AttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const U_MVP: &str = "u_mvp";
pub const U_MV_NORMAL: &str = "u_mv_normal";
pub const U_POINTSIZE: &str = "u_pointsize";
pub const U_COLOR_MODE: &str = "u_color_mode";
pub const U_COLOR: &str = "u_color";
pub const U_AMBIENT: &str = "u_ambient";
pub const U_DIFFUSE: &str = "u_diffuse";
pub const U_SPECULAR: &str = "u_specular";
pub const U_VALUE_MIN: &str = "u_value_min";
pub const U_VALUE_MAX: &str = "u_value_max";
