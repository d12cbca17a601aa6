use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Resolves a shader source identifier (e.g. `"basic.vert"`) to GLSL text.
pub trait ShaderSourceLoader {
    fn load(&self, source_id: &str) -> io::Result<String>;
}

/// Loads sources from files below `root`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ShaderSourceLoader for DirectoryLoader {
    fn load(&self, source_id: &str) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(source_id))
    }
}

/// Sources held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader preloaded with the shaders bundled in this crate:
    /// `basic.vert`, `basic.frag`, `crosshair.vert`, `crosshair.frag`.
    pub fn builtin() -> Self {
        Self::new()
            .with("basic.vert", include_str!("glsl/basic.vert"))
            .with("basic.frag", include_str!("glsl/basic.frag"))
            .with("crosshair.vert", include_str!("glsl/crosshair.vert"))
            .with("crosshair.frag", include_str!("glsl/crosshair.frag"))
    }

    pub fn with(mut self, source_id: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(source_id, source);
        self
    }

    pub fn insert(&mut self, source_id: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(source_id.into(), source.into());
    }
}

impl ShaderSourceLoader for MemoryLoader {
    fn load(&self, source_id: &str) -> io::Result<String> {
        self.sources.get(source_id).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no in-memory shader named `{source_id}`"),
            )
        })
    }
}
