use glow::HasContext;

use crate::error::{GlooError, Result};
use crate::uniform::UniformValue;

use super::{
    BufferId, DrawMode, GraphicsContext, PolygonMode, ProgramId, ShaderId, ShaderStage,
    TextureFilter, TextureId, UniformLocation, VertexArrayId,
};

/// [`GraphicsContext`] over a live desktop GL 3.3+ context.
///
/// The caller owns context creation and makes it current before any call.
/// Buffer and vertex-array bindings are restored to zero after each
/// operation so no hidden binding state leaks between painters.
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn into_inner(self) -> glow::Context {
        self.gl
    }
}

fn creation(what: &'static str) -> impl FnOnce(String) -> GlooError {
    move |reason| GlooError::ResourceCreation { what, reason }
}

fn draw_mode(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Points => glow::POINTS,
        DrawMode::Lines => glow::LINES,
        DrawMode::Triangles => glow::TRIANGLES,
        DrawMode::LineStrip => glow::LINE_STRIP,
        DrawMode::LineLoop => glow::LINE_LOOP,
    }
}

fn polygon_mode(mode: PolygonMode) -> u32 {
    match mode {
        PolygonMode::Point => glow::POINT,
        PolygonMode::Line => glow::LINE,
        PolygonMode::Fill => glow::FILL,
    }
}

fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
    }
}

fn filter(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST as i32,
        TextureFilter::Linear => glow::LINEAR as i32,
    }
}

impl GraphicsContext for GlowContext {
    fn create_program(&mut self) -> Result<ProgramId> {
        let program = unsafe { self.gl.create_program() }.map_err(creation("program"))?;
        Ok(ProgramId(program.0))
    }

    fn delete_program(&mut self, program: ProgramId) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program.0)) };
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId> {
        let shader = unsafe { self.gl.create_shader(shader_type(stage)) }.map_err(creation("shader"))?;
        Ok(ShaderId(shader.0))
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> std::result::Result<(), String> {
        let shader = glow::NativeShader(shader.0);
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(shader))
            }
        }
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        unsafe {
            self.gl
                .attach_shader(glow::NativeProgram(program.0), glow::NativeShader(shader.0))
        };
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader.0)) };
    }

    fn link_program(&mut self, program: ProgramId) -> std::result::Result<(), String> {
        let program = glow::NativeProgram(program.0);
        unsafe {
            self.gl.link_program(program);
            if self.gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(program))
            }
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        unsafe { self.gl.use_program(program.map(|p| glow::NativeProgram(p.0))) };
    }

    fn attribute_location(&mut self, program: ProgramId, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(glow::NativeProgram(program.0), name) }
    }

    fn active_uniforms(&mut self, program: ProgramId) -> Vec<(String, UniformLocation)> {
        let program = glow::NativeProgram(program.0);
        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .filter_map(|active| {
                    // Arrays report `name[0]`.
                    let name = active.name.trim_end_matches("[0]").to_string();
                    let location = self.gl.get_uniform_location(program, &name)?;
                    Some((name, UniformLocation(location.0)))
                })
                .collect()
        }
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        let loc = glow::NativeUniformLocation(location.0);
        let loc = Some(&loc);
        unsafe {
            match value {
                UniformValue::Float(v) => self.gl.uniform_1_f32(loc, *v),
                UniformValue::Int(v) => self.gl.uniform_1_i32(loc, *v),
                UniformValue::Color([r, g, b]) => self.gl.uniform_3_f32(loc, *r, *g, *b),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(loc, *x, *y, *z, *w),
                UniformValue::Mat3(m) => {
                    self.gl
                        .uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    self.gl
                        .uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array())
                }
            }
        }
    }

    fn create_buffer(&mut self) -> Result<BufferId> {
        let buffer = unsafe { self.gl.create_buffer() }.map_err(creation("buffer"))?;
        Ok(BufferId(buffer.0))
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.0)) };
    }

    fn allocate_buffer(&mut self, buffer: BufferId, size: usize, contents: Option<&[u8]>) {
        unsafe {
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.0)));
            match contents {
                Some(bytes) => {
                    self.gl
                        .buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW)
                }
                None => self
                    .gl
                    .buffer_data_size(glow::ARRAY_BUFFER, size as i32, glow::STATIC_DRAW),
            }
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn write_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]) {
        unsafe {
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.0)));
            self.gl
                .buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, offset as i32, data);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(creation("vertex array"))?;
        Ok(VertexArrayId(vao.0))
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(vao.0)) };
    }

    fn vertex_attribute_pointer(
        &mut self,
        vao: VertexArrayId,
        buffer: BufferId,
        location: u32,
        components: usize,
        stride_bytes: usize,
    ) {
        unsafe {
            self.gl
                .bind_vertex_array(Some(glow::NativeVertexArray(vao.0)));
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.0)));
            self.gl.vertex_attrib_pointer_f32(
                location,
                components as i32,
                glow::FLOAT,
                false,
                stride_bytes as i32,
                0,
            );
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_vertex_array(None);
        }
    }

    fn set_vertex_attribute_enabled(&mut self, vao: VertexArrayId, location: u32, enabled: bool) {
        unsafe {
            self.gl
                .bind_vertex_array(Some(glow::NativeVertexArray(vao.0)));
            if enabled {
                self.gl.enable_vertex_attrib_array(location);
            } else {
                self.gl.disable_vertex_attrib_array(location);
            }
            self.gl.bind_vertex_array(None);
        }
    }

    fn create_texture(&mut self) -> Result<TextureId> {
        let texture = unsafe { self.gl.create_texture() }.map_err(creation("texture"))?;
        Ok(TextureId(texture.0))
    }

    fn delete_texture(&mut self, texture: TextureId) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture.0)) };
    }

    fn bind_texture_1d(&mut self, texture: Option<TextureId>, filter_mode: TextureFilter) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl
                .bind_texture(glow::TEXTURE_1D, texture.map(|t| glow::NativeTexture(t.0)));
            if texture.is_some() {
                let f = filter(filter_mode);
                self.gl.tex_parameter_i32(
                    glow::TEXTURE_1D,
                    glow::TEXTURE_WRAP_S,
                    glow::CLAMP_TO_EDGE as i32,
                );
                self.gl
                    .tex_parameter_i32(glow::TEXTURE_1D, glow::TEXTURE_MIN_FILTER, f);
                self.gl
                    .tex_parameter_i32(glow::TEXTURE_1D, glow::TEXTURE_MAG_FILTER, f);
            }
        }
    }

    fn upload_texture_1d(&mut self, texture: TextureId, width: usize, rgb: &[u8]) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl
                .bind_texture(glow::TEXTURE_1D, Some(glow::NativeTexture(texture.0)));
            // RGB rows are not 4-byte aligned.
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_1d(
                glow::TEXTURE_1D,
                0,
                glow::RGB as i32,
                width as i32,
                0,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(rgb)),
            );
        }
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, polygon_mode(mode)) };
    }

    fn draw_arrays(&mut self, vao: VertexArrayId, mode: DrawMode, first: usize, count: usize) {
        unsafe {
            self.gl
                .bind_vertex_array(Some(glow::NativeVertexArray(vao.0)));
            self.gl
                .draw_arrays(draw_mode(mode), first as i32, count as i32);
            self.gl.bind_vertex_array(None);
        }
    }
}
