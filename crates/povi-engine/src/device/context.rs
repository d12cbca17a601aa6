use crate::error::Result;
use crate::uniform::UniformValue;

use super::{
    BufferId, DrawMode, PolygonMode, ProgramId, ShaderId, ShaderStage, TextureFilter, TextureId,
    UniformLocation, VertexArrayId,
};

/// Minimal GL-style command surface used by every GPU resource.
///
/// Object handles are explicit: nothing relies on "currently bound buffer"
/// state except the program selected by [`use_program`](Self::use_program),
/// which is the target of [`set_uniform`](Self::set_uniform), and the
/// texture bound to unit 0.
///
/// Compile and link report the driver's info log as `Err(String)`; callers
/// turn those into [`GlooError`](crate::GlooError) with context attached.
pub trait GraphicsContext {
    // ── programs & shaders ──

    fn create_program(&mut self) -> Result<ProgramId>;
    fn delete_program(&mut self, program: ProgramId);

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId>;
    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> std::result::Result<(), String>;
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId);
    fn delete_shader(&mut self, shader: ShaderId);

    fn link_program(&mut self, program: ProgramId) -> std::result::Result<(), String>;
    fn use_program(&mut self, program: Option<ProgramId>);

    /// Location of a vertex input in a linked program, `None` if inactive.
    fn attribute_location(&mut self, program: ProgramId, name: &str) -> Option<u32>;
    /// Active uniforms of a linked program.
    fn active_uniforms(&mut self, program: ProgramId) -> Vec<(String, UniformLocation)>;
    /// Uploads a uniform value into the program selected by `use_program`.
    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue);

    // ── buffers & vertex arrays ──

    fn create_buffer(&mut self) -> Result<BufferId>;
    fn delete_buffer(&mut self, buffer: BufferId);
    /// (Re)allocates `size` bytes of storage, optionally initialised from `contents`.
    fn allocate_buffer(&mut self, buffer: BufferId, size: usize, contents: Option<&[u8]>);
    fn write_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]);

    fn create_vertex_array(&mut self) -> Result<VertexArrayId>;
    fn delete_vertex_array(&mut self, vao: VertexArrayId);
    /// Points `location` of `vao` at tightly packed `f32` data in `buffer`.
    fn vertex_attribute_pointer(
        &mut self,
        vao: VertexArrayId,
        buffer: BufferId,
        location: u32,
        components: usize,
        stride_bytes: usize,
    );
    fn set_vertex_attribute_enabled(&mut self, vao: VertexArrayId, location: u32, enabled: bool);

    // ── textures ──

    fn create_texture(&mut self) -> Result<TextureId>;
    fn delete_texture(&mut self, texture: TextureId);
    /// Binds a 1-D texture to unit 0 with clamp-to-edge wrapping and `filter`.
    fn bind_texture_1d(&mut self, texture: Option<TextureId>, filter: TextureFilter);
    /// Uploads `width` tightly packed RGB8 texels.
    fn upload_texture_1d(&mut self, texture: TextureId, width: usize, rgb: &[u8]);

    // ── drawing ──

    fn set_polygon_mode(&mut self, mode: PolygonMode);
    fn draw_arrays(&mut self, vao: VertexArrayId, mode: DrawMode, first: usize, count: usize);
}
