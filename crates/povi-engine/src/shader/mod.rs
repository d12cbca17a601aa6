//! Shader programs.
//!
//! A [`ShaderProgram`] is a list of source identifiers whose stage is taken
//! from the file extension, built and linked lazily into a GPU program. After
//! a successful link the program's attribute and uniform interface is
//! resolved once and cached; binding a name the program does not expose is
//! logged the first time and ignored afterwards.

mod loader;
mod program;

pub use loader::{DirectoryLoader, MemoryLoader, ShaderSourceLoader};
pub use program::{ShaderProgram, ShaderState, SharedShader};
