use std::fmt;
use std::num::NonZeroU32;

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            #[inline]
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

object_id!(
    /// Linked (or linkable) shader program object.
    ProgramId, "program"
);
object_id!(
    /// Single shader stage object. Short-lived: deleted once attached.
    ShaderId, "shader"
);
object_id!(
    /// Vertex buffer object.
    BufferId, "buffer"
);
object_id!(
    /// Vertex array object holding attribute pointer state.
    VertexArrayId, "vao"
);
object_id!(
    /// Texture object (1-D in practice).
    TextureId, "texture"
);

/// Location of an active uniform within a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UniformLocation(pub u32);
