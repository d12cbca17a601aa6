use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::buffer::AttributeBuffer;
use crate::device::{GraphicsContext, VertexArrayId};
use crate::error::Result;
use crate::names::AttributeName;
use crate::shader::SharedShader;

/// Named attribute buffers wired into one vertex array for one shader.
///
/// Pointer state is rebuilt in full whenever an attribute is enabled and
/// whenever the shader relinks, since a relink may move attribute locations.
#[derive(Debug)]
pub struct AttributeHost {
    shader: SharedShader,
    attributes: BTreeMap<AttributeName, AttributeBuffer>,
    enabled: BTreeSet<AttributeName>,
    vertex_array: Option<VertexArrayId>,
    wired_generation: Option<u64>,
    wired_locations: BTreeSet<u32>,
}

impl AttributeHost {
    pub fn new(shader: SharedShader, names: &[AttributeName]) -> Self {
        Self {
            shader,
            attributes: names.iter().map(|n| (*n, AttributeBuffer::new())).collect(),
            enabled: BTreeSet::new(),
            vertex_array: None,
            wired_generation: None,
            wired_locations: BTreeSet::new(),
        }
    }

    pub fn shader(&self) -> &SharedShader {
        &self.shader
    }

    /// Switches to another shader; pointers are rewired on the next sync.
    pub fn set_shader(&mut self, shader: SharedShader) {
        if !Rc::ptr_eq(&self.shader, &shader) {
            self.shader = shader;
            self.wired_generation = None;
        }
    }

    pub fn buffer(&self, name: AttributeName) -> Option<&AttributeBuffer> {
        self.attributes.get(&name)
    }

    /// Buffer for `name`, created on demand.
    pub fn buffer_mut(&mut self, name: AttributeName) -> &mut AttributeBuffer {
        self.attributes.entry(name).or_default()
    }

    pub fn is_enabled(&self, name: AttributeName) -> bool {
        self.enabled.contains(&name)
    }

    pub fn vertex_array(&self) -> Option<VertexArrayId> {
        self.vertex_array
    }

    fn ensure_vertex_array(&mut self, ctx: &mut dyn GraphicsContext) -> Result<VertexArrayId> {
        if let Some(vao) = self.vertex_array {
            return Ok(vao);
        }
        let vao = ctx.create_vertex_array()?;
        self.vertex_array = Some(vao);
        Ok(vao)
    }

    /// Creates the vertex array and every declared buffer. Idempotent.
    pub fn init(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        self.ensure_vertex_array(ctx)?;
        for buffer in self.attributes.values_mut() {
            buffer.init(ctx)?;
        }
        self.wire(ctx)
    }

    /// Uploads `count` vertices of `stride` floats into `name`, then enables it.
    pub fn set_attribute(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        name: AttributeName,
        data: &[f32],
        count: usize,
        stride: usize,
    ) -> Result<()> {
        self.buffer_mut(name).set_data(ctx, data, count, stride)?;
        self.enable_attribute(ctx, name)
    }

    /// Marks `name` as a live vertex input and rewires every pointer.
    pub fn enable_attribute(&mut self, ctx: &mut dyn GraphicsContext, name: AttributeName) -> Result<()> {
        self.buffer_mut(name);
        self.enabled.insert(name);
        self.wire(ctx)
    }

    pub fn disable_attribute(&mut self, ctx: &mut dyn GraphicsContext, name: AttributeName) {
        if !self.enabled.remove(&name) {
            return;
        }
        let Some(vao) = self.vertex_array else { return };
        if let Some(location) = self.shader.borrow_mut().attribute_location(name) {
            ctx.set_vertex_attribute_enabled(vao, location, false);
            self.wired_locations.remove(&location);
        }
    }

    /// Rewires if the shader relinked since the last wiring.
    pub fn sync(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        let generation = self.shader.borrow().generation();
        if self.wired_generation != Some(generation) {
            self.wire(ctx)?;
        }
        Ok(())
    }

    /// Points every enabled attribute that has storage at its shader
    /// location. Attributes the shader does not use are skipped, and
    /// locations left over from an earlier wiring are switched off.
    fn wire(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        let vao = self.ensure_vertex_array(ctx)?;
        let mut shader = self.shader.borrow_mut();
        if !shader.is_linked() {
            return Ok(());
        }

        let mut wired = BTreeSet::new();
        for name in &self.enabled {
            let Some(buffer) = self.attributes.get(name) else { continue };
            let (Some(id), stride) = (buffer.id(), buffer.stride()) else { continue };
            if stride == 0 {
                continue;
            }
            let Some(location) = shader.attribute_location(*name) else { continue };
            ctx.vertex_attribute_pointer(vao, id, location, stride, stride * buffer.element_size());
            ctx.set_vertex_attribute_enabled(vao, location, true);
            wired.insert(location);
        }
        for stale in self.wired_locations.difference(&wired) {
            ctx.set_vertex_attribute_enabled(vao, *stale, false);
        }

        self.wired_locations = wired;
        self.wired_generation = Some(shader.generation());
        Ok(())
    }

    /// Deletes the vertex array and every buffer.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        for buffer in self.attributes.values_mut() {
            buffer.release(ctx);
        }
        if let Some(vao) = self.vertex_array.take() {
            ctx.delete_vertex_array(vao);
        }
        self.wired_generation = None;
        self.wired_locations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GlCall, RecordingContext};
    use crate::shader::{MemoryLoader, ShaderProgram};

    fn shader() -> SharedShader {
        ShaderProgram::with_sources(Rc::new(MemoryLoader::builtin()), ["basic.vert", "basic.frag"]).into_shared()
    }

    fn pointers(ctx: &RecordingContext) -> Vec<(u32, usize)> {
        ctx.calls()
            .iter()
            .filter_map(|c| match c {
                GlCall::VertexAttributePointer { location, components, .. } => Some((*location, *components)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn enable_wires_pointer_at_shader_location() {
        let mut ctx = RecordingContext::new();
        let shader = shader();
        shader.borrow_mut().init(&mut ctx).unwrap();

        let mut host = AttributeHost::new(shader, &AttributeName::ALL);
        host.init(&mut ctx).unwrap();
        host.set_attribute(&mut ctx, AttributeName::Position, &[0.0; 6], 2, 3).unwrap();
        ctx.take_calls();

        host.enable_attribute(&mut ctx, AttributeName::Position).unwrap();
        assert_eq!(pointers(&ctx), vec![(0, 3)]);
    }

    #[test]
    fn enabling_second_attribute_rewires_all() {
        let mut ctx = RecordingContext::new();
        let shader = shader();
        shader.borrow_mut().init(&mut ctx).unwrap();

        let mut host = AttributeHost::new(shader, &AttributeName::ALL);
        host.set_attribute(&mut ctx, AttributeName::Position, &[0.0; 3], 1, 3).unwrap();
        host.set_attribute(&mut ctx, AttributeName::Value, &[1.0], 1, 1).unwrap();
        host.enable_attribute(&mut ctx, AttributeName::Position).unwrap();
        ctx.take_calls();

        host.enable_attribute(&mut ctx, AttributeName::Value).unwrap();
        assert_eq!(pointers(&ctx).len(), 2);
    }

    #[test]
    fn relink_triggers_rewire_on_sync() {
        let mut ctx = RecordingContext::new();
        let shader = shader();
        shader.borrow_mut().init(&mut ctx).unwrap();

        let mut host = AttributeHost::new(Rc::clone(&shader), &[AttributeName::Position]);
        host.set_attribute(&mut ctx, AttributeName::Position, &[0.0; 3], 1, 3).unwrap();
        host.enable_attribute(&mut ctx, AttributeName::Position).unwrap();

        ctx.take_calls();
        host.sync(&mut ctx).unwrap();
        assert!(pointers(&ctx).is_empty());

        shader.borrow_mut().reload(&mut ctx).unwrap();
        ctx.take_calls();
        host.sync(&mut ctx).unwrap();
        assert_eq!(pointers(&ctx), vec![(0, 3)]);
    }

    fn toggles(ctx: &RecordingContext) -> Vec<(u32, bool)> {
        ctx.calls()
            .iter()
            .filter_map(|c| match c {
                GlCall::SetVertexAttributeEnabled { location, enabled, .. } => Some((*location, *enabled)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn relink_switches_off_locations_no_longer_wired() {
        let loader = MemoryLoader::builtin()
            .with("plain.vert", "in vec3 position;\nin float value;\nuniform mat4 u_mvp;\n")
            .with("lit.vert", "in vec3 position;\nin vec3 normal;\nin float value;\nuniform mat4 u_mvp;\n");
        let mut ctx = RecordingContext::new();
        let shader = ShaderProgram::with_sources(Rc::new(loader), ["plain.vert", "basic.frag"]).into_shared();
        shader.borrow_mut().init(&mut ctx).unwrap();

        let mut host = AttributeHost::new(Rc::clone(&shader), &AttributeName::ALL);
        host.set_attribute(&mut ctx, AttributeName::Position, &[0.0; 3], 1, 3).unwrap();
        host.set_attribute(&mut ctx, AttributeName::Value, &[1.0], 1, 1).unwrap();
        assert_eq!(shader.borrow_mut().attribute_location(AttributeName::Value), Some(1));

        {
            let mut program = shader.borrow_mut();
            program.set_sources(["lit.vert", "basic.frag"]);
            program.reload(&mut ctx).unwrap();
        }
        assert_eq!(shader.borrow_mut().attribute_location(AttributeName::Value), Some(2));
        ctx.take_calls();

        host.sync(&mut ctx).unwrap();
        assert_eq!(pointers(&ctx), vec![(0, 3), (2, 1)]);
        assert_eq!(toggles(&ctx), vec![(0, true), (2, true), (1, false)]);
    }

    #[test]
    fn unlinked_shader_defers_wiring() {
        let mut ctx = RecordingContext::new();
        let shader = shader();
        let mut host = AttributeHost::new(Rc::clone(&shader), &[AttributeName::Position]);
        host.set_attribute(&mut ctx, AttributeName::Position, &[0.0; 3], 1, 3).unwrap();
        host.enable_attribute(&mut ctx, AttributeName::Position).unwrap();
        assert!(pointers(&ctx).is_empty());

        shader.borrow_mut().init(&mut ctx).unwrap();
        host.sync(&mut ctx).unwrap();
        assert_eq!(pointers(&ctx), vec![(0, 3)]);
    }

    #[test]
    fn release_deletes_everything() {
        let mut ctx = RecordingContext::new();
        let mut host = AttributeHost::new(shader(), &AttributeName::ALL);
        host.init(&mut ctx).unwrap();
        assert_eq!(ctx.live_buffers(), 4);
        host.release(&mut ctx);
        assert_eq!(ctx.live_buffers(), 0);
        assert!(host.vertex_array().is_none());
    }
}
