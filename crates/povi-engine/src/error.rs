use std::io;

use thiserror::Error;

use crate::device::BufferId;

/// Errors raised by GPU resource operations.
///
/// Rendering never returns these: a painter that cannot draw logs and skips
/// the frame. They surface from explicit setup calls (`init`, `set_data`,
/// `reload`, ...) where the caller can react.
#[derive(Debug, Error)]
pub enum GlooError {
    #[error("cannot infer shader stage from `{source_id}` (expected .vert, .frag or .geom)")]
    UnknownShaderStage { source_id: String },

    #[error("failed to load shader source `{source_id}`")]
    ShaderSource {
        source_id: String,
        #[source]
        source: io::Error,
    },

    #[error("shader program failed to link:\n{log}")]
    ShaderLinkFailed { log: String },

    #[error("shader program has not been linked")]
    ShaderNotLinked,

    #[error(
        "write of {count} vertices at offset {offset} exceeds the {reserved} vertices reserved in {buffer:?}"
    )]
    BufferRangeExceeded {
        buffer: Option<BufferId>,
        offset: usize,
        count: usize,
        reserved: usize,
    },

    #[error("attribute data holds {actual} floats, expected {expected} ({length} vertices x {stride})")]
    AttributeDataMismatch {
        expected: usize,
        actual: usize,
        length: usize,
        stride: usize,
    },

    #[error("texture data holds {actual} bytes, expected at least {expected} for {width} RGB texels")]
    TextureDataMismatch {
        expected: usize,
        actual: usize,
        width: usize,
    },

    #[error("GPU refused to create {what}: {reason}")]
    ResourceCreation { what: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, GlooError>;
