use std::collections::HashMap;
use std::num::NonZeroU32;

use crate::error::Result;
use crate::uniform::UniformValue;

use super::{
    BufferId, DrawMode, GraphicsContext, PolygonMode, ProgramId, ShaderId, ShaderStage,
    TextureFilter, TextureId, UniformLocation, VertexArrayId,
};

/// One command observed by [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateProgram(ProgramId),
    DeleteProgram(ProgramId),
    CreateShader(ShaderId, ShaderStage),
    CompileShader { shader: ShaderId, ok: bool },
    AttachShader(ProgramId, ShaderId),
    DeleteShader(ShaderId),
    LinkProgram { program: ProgramId, ok: bool },
    UseProgram(Option<ProgramId>),
    SetUniform { name: String, value: UniformValue },

    CreateBuffer(BufferId),
    DeleteBuffer(BufferId),
    AllocateBuffer { buffer: BufferId, size: usize, initialised: bool },
    WriteBuffer { buffer: BufferId, offset: usize, len: usize },

    CreateVertexArray(VertexArrayId),
    DeleteVertexArray(VertexArrayId),
    VertexAttributePointer {
        vao: VertexArrayId,
        buffer: BufferId,
        location: u32,
        components: usize,
        stride_bytes: usize,
    },
    SetVertexAttributeEnabled { vao: VertexArrayId, location: u32, enabled: bool },

    CreateTexture(TextureId),
    DeleteTexture(TextureId),
    BindTexture1d { texture: Option<TextureId>, filter: TextureFilter },
    UploadTexture1d { texture: TextureId, width: usize },

    SetPolygonMode(PolygonMode),
    DrawArrays { vao: VertexArrayId, mode: DrawMode, first: usize, count: usize },
}

#[derive(Debug)]
struct StageObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Clone)]
struct AttachedStage {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<AttachedStage>,
    attributes: Vec<String>,
    uniforms: Vec<String>,
    linked: bool,
}

/// In-memory [`GraphicsContext`] that records every call.
///
/// Besides the call log it keeps enough object state to behave like a
/// driver: buffer and texture bytes are stored, and linking derives the
/// program interface from the GLSL declarations of the attached stages
/// (`in`/`attribute` in the vertex stage, `uniform` everywhere).
///
/// Failure rules:
/// - a stage whose source contains `#error` fails to compile
/// - a program without a compiled vertex stage fails to link
#[derive(Debug, Default)]
pub struct RecordingContext {
    next_id: u32,
    calls: Vec<GlCall>,
    shaders: HashMap<ShaderId, StageObject>,
    programs: HashMap<ProgramId, ProgramObject>,
    buffers: HashMap<BufferId, Vec<u8>>,
    textures: HashMap<TextureId, Vec<u8>>,
    vertex_arrays: Vec<VertexArrayId>,
    current_program: Option<ProgramId>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_raw(&mut self) -> NonZeroU32 {
        self.next_id = self.next_id.saturating_add(1);
        NonZeroU32::new(self.next_id).unwrap_or(NonZeroU32::MAX)
    }

    // ── inspection ──

    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Returns and clears the recorded calls; object state is kept.
    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    /// `(mode, first, count)` of every recorded draw.
    pub fn draw_calls(&self) -> Vec<(DrawMode, usize, usize)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GlCall::DrawArrays { mode, first, count, .. } => Some((*mode, *first, *count)),
                _ => None,
            })
            .collect()
    }

    /// Names of every uniform upload, in call order.
    pub fn uniform_binds(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GlCall::SetUniform { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Most recent value uploaded for `name`.
    pub fn last_uniform(&self, name: &str) -> Option<&UniformValue> {
        self.calls.iter().rev().find_map(|c| match c {
            GlCall::SetUniform { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    pub fn texture_binds(&self) -> Vec<Option<TextureId>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GlCall::BindTexture1d { texture, .. } => Some(*texture),
                _ => None,
            })
            .collect()
    }

    pub fn buffer_contents(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    pub fn texture_contents(&self, texture: TextureId) -> Option<&[u8]> {
        self.textures.get(&texture).map(Vec::as_slice)
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.current_program
    }

    fn uniform_name(&self, location: UniformLocation) -> Option<&str> {
        let program = self.programs.get(&self.current_program?)?;
        program.uniforms.get(location.0 as usize).map(String::as_str)
    }
}

/// Extracts the declared name from `<qualifier> <type> <name>[...];`.
fn declared_name(line: &str, qualifiers: &[&str]) -> Option<String> {
    let mut line = line.trim();
    if let Some(rest) = line.strip_prefix("layout") {
        line = rest.split_once(')')?.1.trim();
    }
    let mut tokens = line.split_whitespace();
    let qualifier = tokens.next()?;
    if !qualifiers.contains(&qualifier) {
        return None;
    }
    let _ty = tokens.next()?;
    let name = tokens.next()?;
    let name = name.trim_end_matches(';');
    let name = name.split('[').next().unwrap_or(name);
    (!name.is_empty()).then(|| name.to_string())
}

fn declarations(source: &str, qualifiers: &[&str]) -> Vec<String> {
    source
        .lines()
        .map(|l| l.split("//").next().unwrap_or(""))
        .filter_map(|l| declared_name(l, qualifiers))
        .collect()
}

impl GraphicsContext for RecordingContext {
    fn create_program(&mut self) -> Result<ProgramId> {
        let id = ProgramId(self.next_raw());
        self.programs.insert(id, ProgramObject::default());
        self.calls.push(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
        self.calls.push(GlCall::DeleteProgram(program));
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId> {
        let id = ShaderId(self.next_raw());
        self.shaders.insert(
            id,
            StageObject {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        self.calls.push(GlCall::CreateShader(id, stage));
        Ok(id)
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> std::result::Result<(), String> {
        let Some(object) = self.shaders.get_mut(&shader) else {
            return Err(format!("{shader:?} does not exist"));
        };
        object.source = source.to_string();
        object.compiled = !source.contains("#error");
        let ok = object.compiled;
        self.calls.push(GlCall::CompileShader { shader, ok });
        if ok {
            Ok(())
        } else {
            Err("0:1(1): error: #error directive encountered".to_string())
        }
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        if let (Some(p), Some(s)) = (self.programs.get_mut(&program), self.shaders.get(&shader)) {
            p.attached.push(AttachedStage {
                stage: s.stage,
                source: s.source.clone(),
                compiled: s.compiled,
            });
        }
        self.calls.push(GlCall::AttachShader(program, shader));
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
        self.calls.push(GlCall::DeleteShader(shader));
    }

    fn link_program(&mut self, program: ProgramId) -> std::result::Result<(), String> {
        let outcome = match self.programs.get_mut(&program) {
            None => Err(format!("{program:?} does not exist")),
            Some(p) if p.attached.iter().any(|s| !s.compiled) => {
                Err("error: linking with uncompiled shader".to_string())
            }
            Some(p) if !p.attached.iter().any(|s| s.stage == ShaderStage::Vertex) => {
                Err("error: program lacks a vertex shader".to_string())
            }
            Some(p) => {
                p.attributes = p
                    .attached
                    .iter()
                    .filter(|s| s.stage == ShaderStage::Vertex)
                    .flat_map(|s| declarations(&s.source, &["in", "attribute"]))
                    .collect();
                let mut uniforms: Vec<String> = p
                    .attached
                    .iter()
                    .flat_map(|s| declarations(&s.source, &["uniform"]))
                    .collect();
                uniforms.sort();
                uniforms.dedup();
                p.uniforms = uniforms;
                p.linked = true;
                Ok(())
            }
        };
        self.calls.push(GlCall::LinkProgram {
            program,
            ok: outcome.is_ok(),
        });
        outcome
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.current_program = program;
        self.calls.push(GlCall::UseProgram(program));
    }

    fn attribute_location(&mut self, program: ProgramId, name: &str) -> Option<u32> {
        let p = self.programs.get(&program).filter(|p| p.linked)?;
        p.attributes.iter().position(|a| a == name).map(|i| i as u32)
    }

    fn active_uniforms(&mut self, program: ProgramId) -> Vec<(String, UniformLocation)> {
        let Some(p) = self.programs.get(&program).filter(|p| p.linked) else {
            return Vec::new();
        };
        p.uniforms
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), UniformLocation(i as u32)))
            .collect()
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue) {
        let name = self
            .uniform_name(location)
            .map(str::to_string)
            .unwrap_or_else(|| format!("<location {}>", location.0));
        self.calls.push(GlCall::SetUniform { name, value: *value });
    }

    fn create_buffer(&mut self) -> Result<BufferId> {
        let id = BufferId(self.next_raw());
        self.buffers.insert(id, Vec::new());
        self.calls.push(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        self.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn allocate_buffer(&mut self, buffer: BufferId, size: usize, contents: Option<&[u8]>) {
        if let Some(storage) = self.buffers.get_mut(&buffer) {
            storage.clear();
            storage.resize(size, 0);
            if let Some(bytes) = contents {
                let n = bytes.len().min(size);
                storage[..n].copy_from_slice(&bytes[..n]);
            }
        }
        self.calls.push(GlCall::AllocateBuffer {
            buffer,
            size,
            initialised: contents.is_some(),
        });
    }

    fn write_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]) {
        if let Some(storage) = self.buffers.get_mut(&buffer) {
            let end = (offset + data.len()).min(storage.len());
            if offset < end {
                storage[offset..end].copy_from_slice(&data[..end - offset]);
            }
        }
        self.calls.push(GlCall::WriteBuffer {
            buffer,
            offset,
            len: data.len(),
        });
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId> {
        let id = VertexArrayId(self.next_raw());
        self.vertex_arrays.push(id);
        self.calls.push(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayId) {
        self.vertex_arrays.retain(|v| *v != vao);
        self.calls.push(GlCall::DeleteVertexArray(vao));
    }

    fn vertex_attribute_pointer(
        &mut self,
        vao: VertexArrayId,
        buffer: BufferId,
        location: u32,
        components: usize,
        stride_bytes: usize,
    ) {
        self.calls.push(GlCall::VertexAttributePointer {
            vao,
            buffer,
            location,
            components,
            stride_bytes,
        });
    }

    fn set_vertex_attribute_enabled(&mut self, vao: VertexArrayId, location: u32, enabled: bool) {
        self.calls.push(GlCall::SetVertexAttributeEnabled {
            vao,
            location,
            enabled,
        });
    }

    fn create_texture(&mut self) -> Result<TextureId> {
        let id = TextureId(self.next_raw());
        self.textures.insert(id, Vec::new());
        self.calls.push(GlCall::CreateTexture(id));
        Ok(id)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
        self.calls.push(GlCall::DeleteTexture(texture));
    }

    fn bind_texture_1d(&mut self, texture: Option<TextureId>, filter: TextureFilter) {
        self.calls.push(GlCall::BindTexture1d { texture, filter });
    }

    fn upload_texture_1d(&mut self, texture: TextureId, width: usize, rgb: &[u8]) {
        if let Some(storage) = self.textures.get_mut(&texture) {
            let n = (width * 3).min(rgb.len());
            *storage = rgb[..n].to_vec();
        }
        self.calls.push(GlCall::UploadTexture1d { texture, width });
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.calls.push(GlCall::SetPolygonMode(mode));
    }

    fn draw_arrays(&mut self, vao: VertexArrayId, mode: DrawMode, first: usize, count: usize) {
        self.calls.push(GlCall::DrawArrays {
            vao,
            mode,
            first,
            count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERT: &str = "#version 330 core\n\
        layout (location = 0) in vec3 position;\n\
        in float value; // scalar\n\
        uniform mat4 u_mvp;\n\
        uniform float u_weights[4];\n";
    const FRAG: &str = "#version 330 core\nuniform vec4 u_color;\nout vec4 color;\n";

    fn linked(ctx: &mut RecordingContext, sources: &[(ShaderStage, &str)]) -> (ProgramId, bool) {
        let program = ctx.create_program().unwrap();
        for (stage, src) in sources {
            let shader = ctx.create_shader(*stage).unwrap();
            let _ = ctx.compile_shader(shader, src);
            ctx.attach_shader(program, shader);
            ctx.delete_shader(shader);
        }
        let ok = ctx.link_program(program).is_ok();
        (program, ok)
    }

    // ── interface reflection ──

    #[test]
    fn link_reflects_declarations() {
        let mut ctx = RecordingContext::new();
        let (program, ok) = linked(&mut ctx, &[(ShaderStage::Vertex, VERT), (ShaderStage::Fragment, FRAG)]);
        assert!(ok);

        assert_eq!(ctx.attribute_location(program, "position"), Some(0));
        assert_eq!(ctx.attribute_location(program, "value"), Some(1));
        assert_eq!(ctx.attribute_location(program, "normal"), None);

        let names: Vec<_> = ctx.active_uniforms(program).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["u_color", "u_mvp", "u_weights"]);
    }

    #[test]
    fn set_uniform_records_name_of_current_program() {
        let mut ctx = RecordingContext::new();
        let (program, _) = linked(&mut ctx, &[(ShaderStage::Vertex, VERT)]);
        let loc = ctx
            .active_uniforms(program)
            .into_iter()
            .find(|(n, _)| n == "u_mvp")
            .map(|(_, l)| l)
            .unwrap();

        ctx.use_program(Some(program));
        ctx.set_uniform(loc, &UniformValue::Float(1.0));
        assert_eq!(ctx.uniform_binds(), vec!["u_mvp"]);
    }

    // ── failure rules ──

    #[test]
    fn error_directive_fails_compile_and_link() {
        let mut ctx = RecordingContext::new();
        let (_, ok) = linked(&mut ctx, &[(ShaderStage::Vertex, "#error broken\n")]);
        assert!(!ok);
    }

    #[test]
    fn missing_vertex_stage_fails_link() {
        let mut ctx = RecordingContext::new();
        let (_, ok) = linked(&mut ctx, &[(ShaderStage::Fragment, FRAG)]);
        assert!(!ok);
    }

    // ── object state ──

    #[test]
    fn buffer_storage_tracks_writes() {
        let mut ctx = RecordingContext::new();
        let buf = ctx.create_buffer().unwrap();
        ctx.allocate_buffer(buf, 6, None);
        ctx.write_buffer(buf, 2, &[7, 8]);
        assert_eq!(ctx.buffer_contents(buf), Some(&[0, 0, 7, 8, 0, 0][..]));

        ctx.delete_buffer(buf);
        assert_eq!(ctx.live_buffers(), 0);
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut ctx = RecordingContext::new();
        let a = ctx.create_buffer().unwrap().get();
        let b = ctx.create_texture().unwrap().get();
        let c = ctx.create_program().unwrap().get();
        assert!(a != b && b != c && a != c);
        assert_eq!(a, 1);
    }
}
