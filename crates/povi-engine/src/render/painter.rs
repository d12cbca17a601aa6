use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;

use crate::colormap::ColorMap;
use crate::coords::BoundingBox;
use crate::core::Drawable;
use crate::device::{DrawMode, GraphicsContext, PolygonMode};
use crate::error::Result;
use crate::geometry::{GeometryCollection, GeometryLayout};
use crate::names::{self, AttributeName};
use crate::shader::{ShaderProgram, ShaderSourceLoader, SharedShader};
use crate::texture::{SharedTexture, Texture1D};
use crate::uniform::{SharedUniform, Uniform, UniformValue};

use super::{AttributeHost, FrameMatrices, PainterConfig};

/// Contiguous slice of the position buffer drawn by one call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SubRange {
    pub offset: usize,
    pub length: usize,
}

/// Presentation snapshot for an external widget layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PainterSummary {
    pub center: Option<Vec3>,
    pub vertex_count: usize,
    pub draw_mode: DrawMode,
    pub polygon_mode: PolygonMode,
}

/// Uniforms every painter owns, with their defaults.
pub fn builtin_uniforms() -> Vec<Uniform> {
    vec![
        Uniform::float_ranged(names::U_POINTSIZE, 2.0, 0.0, 20.0),
        Uniform::int(names::U_COLOR_MODE, 0),
        Uniform::vec4(names::U_COLOR, [1.0, 1.0, 1.0, 1.0]),
        Uniform::float_ranged(names::U_AMBIENT, 0.85, 0.0, 1.0),
        Uniform::float_ranged(names::U_DIFFUSE, 1.0, 0.0, 1.0),
        Uniform::float_ranged(names::U_SPECULAR, 0.1, 0.0, 1.0),
    ]
}

/// Geometry painter.
///
/// Embeds an [`AttributeHost`] and adds:
/// - a bounding box that always matches the position buffer
/// - per-element sub-ranges for line strings and rings
/// - a weak texture reference and weak external uniforms
/// - the builtin lighting/point-size uniforms
///
/// GPU objects are created on the first `render` (or an explicit `init`).
#[derive(Debug)]
pub struct Painter {
    host: AttributeHost,

    bbox: BoundingBox,
    subranges: Vec<SubRange>,
    draw_mode: DrawMode,
    polygon_mode: PolygonMode,

    texture: Option<Weak<RefCell<Texture1D>>>,
    builtins: Vec<Uniform>,
    externals: Vec<Weak<RefCell<Uniform>>>,

    initialised: bool,
    warned_init: bool,
}

impl Painter {
    pub fn new(shader: SharedShader) -> Self {
        let config = PainterConfig::default();
        Self {
            host: AttributeHost::new(shader, &AttributeName::ALL),
            bbox: BoundingBox::new(),
            subranges: Vec::new(),
            draw_mode: config.draw_mode,
            polygon_mode: config.polygon_mode,
            texture: None,
            builtins: builtin_uniforms(),
            externals: Vec::new(),
            initialised: false,
            warned_init: false,
        }
    }

    /// Painter with its own shader built from `config`'s sources.
    pub fn from_config(loader: Rc<dyn ShaderSourceLoader>, config: &PainterConfig) -> Self {
        let shader = ShaderProgram::with_sources(
            loader,
            [config.vertex_shader.as_str(), config.fragment_shader.as_str()],
        );
        let mut painter = Self::new(shader.into_shared());
        painter.draw_mode = config.draw_mode;
        painter.polygon_mode = config.polygon_mode;
        painter
    }

    pub fn host(&self) -> &AttributeHost {
        &self.host
    }

    pub fn shader(&self) -> &SharedShader {
        self.host.shader()
    }

    // ── geometry ingestion ──

    /// Uploads a whole attribute. For `Position` the sub-range partition is
    /// dropped and the bounding box recomputed from `data`.
    pub fn set_attribute(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        name: AttributeName,
        data: &[f32],
        count: usize,
        stride: usize,
    ) -> Result<()> {
        self.host.set_attribute(ctx, name, data, count, stride)?;
        if name == AttributeName::Position {
            self.subranges.clear();
            self.bbox.clear();
            self.bbox.add_flat(data, stride);
            self.log_positions();
        }
        Ok(())
    }

    /// Replaces the position buffer with `geometry`.
    ///
    /// Points and triangles upload in one block and draw in one call. Line
    /// strings and rings are written element by element into a reserved
    /// buffer, each element becoming its own draw call. Empty elements add
    /// no sub-range.
    pub fn set_geometry(&mut self, ctx: &mut dyn GraphicsContext, geometry: &GeometryCollection) -> Result<()> {
        self.subranges.clear();
        self.bbox.clear();

        let kind = geometry.kind();
        let stride = geometry.dimension();
        match geometry.layout() {
            GeometryLayout::Fixed(vertices) => {
                let data: &[f32] = bytemuck::cast_slice(vertices);
                self.host
                    .buffer_mut(AttributeName::Position)
                    .set_data(ctx, data, vertices.len(), stride)?;
                self.bbox.add_points(vertices);
            }
            GeometryLayout::Variable(elements) => {
                let total = geometry.vertex_count();
                let buffer = self.host.buffer_mut(AttributeName::Position);
                buffer.reserve_data(ctx, total, stride)?;

                let mut offset = 0;
                for element in elements.iter().filter(|e| !e.is_empty()) {
                    buffer.set_subdata(ctx, bytemuck::cast_slice(element), offset, element.len())?;
                    self.subranges.push(SubRange {
                        offset,
                        length: element.len(),
                    });
                    self.bbox.add_points(element);
                    offset += element.len();
                }
            }
        }

        self.draw_mode = kind.draw_mode();
        self.host.enable_attribute(ctx, AttributeName::Position)?;
        log::debug!(
            "ingested {} {:?} elements ({} vertices, {} sub-ranges)",
            geometry.len(),
            kind,
            geometry.vertex_count(),
            self.subranges.len()
        );
        self.log_positions();
        Ok(())
    }

    /// Stops feeding `name`. Clearing `Position` also empties the position
    /// buffer, the sub-ranges and the bounding box, so nothing is drawn.
    pub fn clear_attribute(&mut self, ctx: &mut dyn GraphicsContext, name: AttributeName) {
        self.host.disable_attribute(ctx, name);
        if name == AttributeName::Position {
            self.host.buffer_mut(name).clear(ctx);
            self.subranges.clear();
            self.bbox.clear();
        }
    }

    fn log_positions(&self) {
        match self.bbox.center() {
            Some(c) => log::debug!("positions: {} vertices, centre {c}", self.vertex_count()),
            None => log::debug!("positions: empty"),
        }
    }

    // ── texture ──

    /// Observes `texture` without extending its lifetime.
    pub fn set_texture(&mut self, texture: &SharedTexture) {
        self.texture = Some(Rc::downgrade(texture));
    }

    pub fn set_texture_weak(&mut self, texture: Weak<RefCell<Texture1D>>) {
        self.texture = Some(texture);
    }

    /// Unbinds the referenced texture if it is still alive and forgets it.
    pub fn remove_texture(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(texture) = self.texture.take().and_then(|t| t.upgrade()) {
            texture.borrow().deactivate(ctx);
        }
    }

    /// The referenced texture, if its owner still holds it.
    pub fn texture(&self) -> Option<SharedTexture> {
        self.texture.as_ref().and_then(Weak::upgrade)
    }

    // ── uniforms ──

    pub fn builtin_uniforms(&self) -> &[Uniform] {
        &self.builtins
    }

    pub fn builtin_uniform_mut(&mut self, name: &str) -> Option<&mut Uniform> {
        self.builtins.iter_mut().find(|u| u.name() == name)
    }

    /// Builtins worth offering for editing in the current modes. Point size
    /// only matters when points are rasterized.
    pub fn editable_uniforms(&self) -> impl Iterator<Item = &Uniform> {
        let points_visible = self.draw_mode == DrawMode::Points
            || (self.draw_mode == DrawMode::Triangles && self.polygon_mode == PolygonMode::Point);
        self.builtins
            .iter()
            .filter(move |u| points_visible || u.name() != names::U_POINTSIZE)
    }

    /// Observes an externally owned uniform. Registering the same handle
    /// twice has no effect.
    pub fn register_uniform(&mut self, uniform: &SharedUniform) {
        let weak = Rc::downgrade(uniform);
        if !self.externals.iter().any(|u| Weak::ptr_eq(u, &weak)) {
            self.externals.push(weak);
        }
    }

    /// Returns true if `uniform` was registered.
    pub fn unregister_uniform(&mut self, uniform: &SharedUniform) -> bool {
        let weak = Rc::downgrade(uniform);
        let before = self.externals.len();
        self.externals.retain(|u| !Weak::ptr_eq(u, &weak));
        self.externals.len() != before
    }

    pub fn clear_uniforms(&mut self) {
        self.externals.clear();
    }

    /// Live external uniforms, in registration order.
    pub fn external_uniforms(&self) -> impl Iterator<Item = SharedUniform> + '_ {
        self.externals.iter().filter_map(Weak::upgrade)
    }

    // ── colour maps ──

    /// Switches to `colormap`: external uniforms are replaced by the
    /// gradient's range uniforms, or categorical `identifiers` are mapped to
    /// texture coordinates and uploaded. The texture is referenced either way.
    pub fn apply_colormap(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        colormap: &ColorMap,
        identifiers: Option<&[i32]>,
    ) -> Result<()> {
        self.clear_uniforms();
        match colormap {
            ColorMap::Gradient {
                value_min,
                value_max,
                ..
            } => {
                for uniform in [value_min, value_max].into_iter().filter_map(Weak::upgrade) {
                    self.register_uniform(&uniform);
                }
            }
            ColorMap::Categorical { .. } => {
                if let Some(ids) = identifiers {
                    let mapped = colormap.map_identifiers(ids);
                    self.set_attribute(ctx, AttributeName::Identifier, &mapped, mapped.len(), 1)?;
                }
            }
        }
        self.set_texture_weak(colormap.texture().clone());
        Ok(())
    }

    /// Forgets the colour map's uniforms and texture.
    pub fn detach_colormap(&mut self, ctx: &mut dyn GraphicsContext) {
        self.clear_uniforms();
        self.remove_texture(ctx);
    }

    // ── presentation ──

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn center(&self) -> Option<Vec3> {
        self.bbox.center()
    }

    pub fn vertex_count(&self) -> usize {
        self.host
            .buffer(AttributeName::Position)
            .map_or(0, |b| b.length())
    }

    pub fn subranges(&self) -> &[SubRange] {
        &self.subranges
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    #[inline]
    pub fn polygon_mode(&self) -> PolygonMode {
        self.polygon_mode
    }

    pub fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.polygon_mode = mode;
    }

    pub fn summary(&self) -> PainterSummary {
        PainterSummary {
            center: self.center(),
            vertex_count: self.vertex_count(),
            draw_mode: self.draw_mode,
            polygon_mode: self.polygon_mode,
        }
    }

    // ── frame ──

    fn ensure_initialised(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        {
            let mut shader = self.host.shader().borrow_mut();
            if shader.needs_init() {
                shader.init(ctx)?;
            }
        }
        if !self.initialised {
            self.host.init(ctx)?;
            self.initialised = true;
            log::debug!("painter initialised ({} vertices)", self.vertex_count());
        }
        Ok(())
    }

    fn bind_texture(&self, ctx: &mut dyn GraphicsContext) {
        let Some(texture) = self.texture() else { return };
        let mut texture = texture.borrow_mut();
        if let Err(e) = texture.init(ctx) {
            log::warn!("colour map texture unavailable: {e}");
            return;
        }
        texture.activate(ctx);
    }

    fn draw(&self, ctx: &mut dyn GraphicsContext) {
        let Some(vao) = self.host.vertex_array() else { return };
        if self.subranges.is_empty() {
            let count = self.vertex_count();
            if count > 0 {
                ctx.draw_arrays(vao, self.draw_mode, 0, count);
            }
            return;
        }
        for range in &self.subranges {
            ctx.draw_arrays(vao, self.draw_mode, range.offset, range.length);
        }
    }

    /// Deletes the painter's buffers and vertex array. The shader is shared
    /// and left alone.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        self.host.release(ctx);
        self.initialised = false;
    }
}

impl Drawable for Painter {
    fn init(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        self.ensure_initialised(ctx)
    }

    fn is_initialised(&self) -> bool {
        self.initialised
    }

    fn render(&mut self, ctx: &mut dyn GraphicsContext, frame: &FrameMatrices) {
        if let Err(e) = self.ensure_initialised(ctx) {
            if !self.warned_init {
                log::error!("painter skipped: {e}");
                self.warned_init = true;
            }
            return;
        }

        // Shader failed to link and nothing older is available.
        if !self.host.shader().borrow().is_linked() {
            return;
        }

        self.bind_texture(ctx);
        if let Err(e) = self.host.sync(ctx) {
            log::error!("painter skipped: {e}");
            return;
        }

        let shader = Rc::clone(self.host.shader());
        let mut shader = shader.borrow_mut();
        shader.activate(ctx);

        shader.bind(ctx, names::U_MVP, UniformValue::Mat4(frame.model_view_projection()));
        shader.bind(ctx, names::U_MV_NORMAL, UniformValue::Mat3(frame.normal_matrix()));

        // Externals go last so they win on name clashes.
        for uniform in &self.builtins {
            uniform.bind(ctx, &mut shader);
        }
        self.externals.retain(|u| u.strong_count() > 0);
        for uniform in self.externals.iter().filter_map(Weak::upgrade) {
            uniform.borrow().bind(ctx, &mut shader);
        }
        drop(shader);

        if self.draw_mode == DrawMode::Triangles {
            ctx.set_polygon_mode(self.polygon_mode);
        }
        self.draw(ctx);
    }

    fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        Painter::release(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::{CategoricalColorMap, GradientColorMap};
    use crate::device::{GlCall, RecordingContext};
    use crate::shader::MemoryLoader;
    use crate::uniform::shared;

    fn painter() -> Painter {
        Painter::from_config(Rc::new(MemoryLoader::builtin()), &PainterConfig::default())
    }

    fn frame() -> FrameMatrices {
        FrameMatrices::default()
    }

    fn points(n: usize) -> GeometryCollection {
        GeometryCollection::Points((0..n).map(|i| [i as f32, 0.0, 0.0]).collect())
    }

    fn line(n: usize, y: f32) -> Vec<[f32; 3]> {
        (0..n).map(|i| [i as f32, y, 0.0]).collect()
    }

    // ── fixed-length geometry ──

    #[test]
    fn points_draw_in_one_call() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(5)).unwrap();

        assert_eq!(p.draw_mode(), DrawMode::Points);
        assert!(p.subranges().is_empty());
        assert_eq!(p.vertex_count(), 5);

        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert_eq!(ctx.draw_calls(), vec![(DrawMode::Points, 0, 5)]);
    }

    #[test]
    fn triangles_apply_polygon_mode() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        p.set_geometry(&mut ctx, &GeometryCollection::Triangles(vec![tri, tri])).unwrap();
        p.set_polygon_mode(PolygonMode::Line);

        p.render(&mut ctx, &frame());
        assert!(ctx.calls().contains(&GlCall::SetPolygonMode(PolygonMode::Line)));
        assert_eq!(ctx.draw_calls(), vec![(DrawMode::Triangles, 0, 6)]);
    }

    #[test]
    fn polygon_mode_untouched_for_points() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(2)).unwrap();
        p.render(&mut ctx, &frame());
        assert!(!ctx.calls().iter().any(|c| matches!(c, GlCall::SetPolygonMode(_))));
    }

    // ── variable-length geometry ──

    #[test]
    fn line_strings_draw_per_element() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        let lines = GeometryCollection::LineStrings(vec![line(3, 0.0), line(5, 1.0), line(2, 2.0)]);
        p.set_geometry(&mut ctx, &lines).unwrap();

        assert_eq!(p.draw_mode(), DrawMode::LineStrip);
        let ranges: Vec<_> = p.subranges().iter().map(|r| (r.offset, r.length)).collect();
        assert_eq!(ranges, vec![(0, 3), (3, 5), (8, 2)]);
        assert_eq!(p.vertex_count(), 10);

        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert_eq!(
            ctx.draw_calls(),
            vec![
                (DrawMode::LineStrip, 0, 3),
                (DrawMode::LineStrip, 3, 5),
                (DrawMode::LineStrip, 8, 2),
            ]
        );
    }

    #[test]
    fn rings_use_line_loop_and_skip_empty_elements() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        let rings = GeometryCollection::LinearRings(vec![line(4, 0.0), Vec::new(), line(3, 1.0)]);
        p.set_geometry(&mut ctx, &rings).unwrap();

        assert_eq!(p.draw_mode(), DrawMode::LineLoop);
        assert_eq!(
            p.subranges(),
            &[SubRange { offset: 0, length: 4 }, SubRange { offset: 4, length: 3 }]
        );
    }

    #[test]
    fn variable_upload_matches_concatenation() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        let a = line(2, 0.0);
        let b = line(3, 5.0);
        p.set_geometry(&mut ctx, &GeometryCollection::LineStrings(vec![a.clone(), b.clone()]))
            .unwrap();

        let id = p.host().buffer(AttributeName::Position).unwrap().id().unwrap();
        let expected: Vec<[f32; 3]> = a.into_iter().chain(b).collect();
        assert_eq!(
            ctx.buffer_contents(id).unwrap(),
            bytemuck::cast_slice::<[f32; 3], u8>(&expected)
        );
    }

    #[test]
    fn geometry_replacement_resets_subranges() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &GeometryCollection::LineStrings(vec![line(3, 0.0)]))
            .unwrap();
        p.set_geometry(&mut ctx, &points(4)).unwrap();
        assert!(p.subranges().is_empty());

        p.set_geometry(&mut ctx, &GeometryCollection::LineStrings(vec![line(3, 0.0)]))
            .unwrap();
        p.set_attribute(&mut ctx, AttributeName::Position, &[0.0; 6], 2, 3)
            .unwrap();
        assert!(p.subranges().is_empty());
    }

    // ── bounding box ──

    #[test]
    fn bounding_box_tracks_every_ingestion_path() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();

        p.set_attribute(&mut ctx, AttributeName::Position, &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0], 2, 3)
            .unwrap();
        assert_eq!(p.center(), Some(Vec3::new(0.5, 1.0, 1.5)));

        p.set_geometry(
            &mut ctx,
            &GeometryCollection::LineStrings(vec![vec![[-2.0, 0.0, 0.0]], vec![[2.0, 4.0, 0.0]]]),
        )
        .unwrap();
        assert_eq!(p.center(), Some(Vec3::new(0.0, 2.0, 0.0)));

        p.clear_attribute(&mut ctx, AttributeName::Position);
        assert_eq!(p.center(), None);
        assert_eq!(p.vertex_count(), 0);
    }

    #[test]
    fn non_position_attributes_leave_bbox_alone() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(3)).unwrap();
        let before = *p.bounding_box();
        p.set_attribute(&mut ctx, AttributeName::Value, &[9.0, 9.0, 9.0], 3, 1)
            .unwrap();
        assert_eq!(*p.bounding_box(), before);
    }

    // ── rendering ──

    #[test]
    fn empty_painter_issues_no_draw() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.render(&mut ctx, &frame());
        assert!(p.is_initialised());
        assert!(ctx.draw_calls().is_empty());
    }

    #[test]
    fn init_happens_once() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(1)).unwrap();
        p.render(&mut ctx, &frame());
        let programs = |ctx: &RecordingContext| {
            ctx.calls().iter().filter(|c| matches!(c, GlCall::CreateProgram(_))).count()
        };
        assert_eq!(programs(&ctx), 1);
        p.render(&mut ctx, &frame());
        assert_eq!(programs(&ctx), 1);
    }

    #[test]
    fn frame_binds_matrices_then_builtins() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(1)).unwrap();
        ctx.take_calls();
        p.render(&mut ctx, &frame());

        assert_eq!(
            ctx.uniform_binds(),
            vec![
                "u_mvp",
                "u_mv_normal",
                "u_pointsize",
                "u_color_mode",
                "u_color",
                "u_ambient",
                "u_diffuse",
                "u_specular",
            ]
        );
    }

    #[test]
    fn external_uniform_follows_registration() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(3)).unwrap();
        let max = shared(Uniform::float(names::U_VALUE_MAX, 7.0));

        p.register_uniform(&max);
        p.register_uniform(&max);
        ctx.take_calls();
        p.render(&mut ctx, &frame());
        let binds = ctx.uniform_binds();
        assert_eq!(binds.iter().filter(|n| **n == "u_value_max").count(), 1);
        assert_eq!(binds.last(), Some(&"u_value_max"));
        assert_eq!(ctx.last_uniform("u_value_max"), Some(&UniformValue::Float(7.0)));

        assert!(p.unregister_uniform(&max));
        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert!(!ctx.uniform_binds().contains(&"u_value_max"));
    }

    #[test]
    fn external_uniform_wins_name_clash() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(1)).unwrap();
        let ambient = shared(Uniform::float(names::U_AMBIENT, 0.25));
        p.register_uniform(&ambient);

        p.render(&mut ctx, &frame());
        assert_eq!(ctx.last_uniform("u_ambient"), Some(&UniformValue::Float(0.25)));
    }

    #[test]
    fn dropped_external_uniform_is_skipped() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(1)).unwrap();
        {
            let min = shared(Uniform::float(names::U_VALUE_MIN, 0.0));
            p.register_uniform(&min);
        }
        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert!(!ctx.uniform_binds().contains(&"u_value_min"));
        assert_eq!(p.external_uniforms().count(), 0);
    }

    #[test]
    fn dropped_texture_owner_means_no_bind() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(2)).unwrap();

        let texture = Texture1D::nearest().into_shared();
        p.set_texture(&texture);
        p.render(&mut ctx, &frame());
        assert_eq!(ctx.texture_binds().len(), 2);

        drop(texture);
        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert!(ctx.texture_binds().is_empty());
        assert_eq!(ctx.draw_calls().len(), 1);
        assert!(p.texture().is_none());
    }

    #[test]
    fn remove_texture_unbinds_live_texture() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        let texture = Texture1D::linear().into_shared();
        p.set_texture(&texture);
        p.remove_texture(&mut ctx);
        assert_eq!(ctx.texture_binds(), vec![None]);
        assert!(p.texture().is_none());
        assert_eq!(Rc::strong_count(&texture), 1);
    }

    #[test]
    fn broken_shader_skips_frames_without_failing() {
        let mut ctx = RecordingContext::new();
        let loader = MemoryLoader::builtin().with("broken.vert", "#error\n");
        let config = PainterConfig {
            vertex_shader: "broken.vert".to_string(),
            ..PainterConfig::default()
        };
        let mut p = Painter::from_config(Rc::new(loader), &config);
        p.set_geometry(&mut ctx, &points(3)).unwrap();

        p.render(&mut ctx, &frame());
        p.render(&mut ctx, &frame());
        assert!(ctx.draw_calls().is_empty());
    }

    #[test]
    fn shader_reload_rewires_on_next_render() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(3)).unwrap();
        p.render(&mut ctx, &frame());

        p.shader().borrow_mut().reload(&mut ctx).unwrap();
        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert!(ctx
            .calls()
            .iter()
            .any(|c| matches!(c, GlCall::VertexAttributePointer { location: 0, components: 3, .. })));
        assert_eq!(ctx.draw_calls(), vec![(DrawMode::Points, 0, 3)]);
    }

    // ── presentation ──

    #[test]
    fn point_size_editable_only_when_points_rasterize() {
        let mut p = painter();
        let has_pointsize = |p: &Painter| p.editable_uniforms().any(|u| u.name() == names::U_POINTSIZE);

        p.set_draw_mode(DrawMode::Triangles);
        p.set_polygon_mode(PolygonMode::Fill);
        assert!(!has_pointsize(&p));

        p.set_polygon_mode(PolygonMode::Point);
        assert!(has_pointsize(&p));

        p.set_draw_mode(DrawMode::Points);
        assert!(has_pointsize(&p));

        p.set_draw_mode(DrawMode::Lines);
        assert!(!has_pointsize(&p));
        assert_eq!(p.editable_uniforms().count(), 5);
    }

    #[test]
    fn builtin_edits_reach_the_shader() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(1)).unwrap();
        p.builtin_uniform_mut(names::U_POINTSIZE).unwrap().set_float(50.0);
        p.render(&mut ctx, &frame());
        assert_eq!(ctx.last_uniform("u_pointsize"), Some(&UniformValue::Float(20.0)));
    }

    #[test]
    fn summary_reports_state() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(3)).unwrap();
        let s = p.summary();
        assert_eq!(s.vertex_count, 3);
        assert_eq!(s.center, Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(s.draw_mode, DrawMode::Points);
        assert_eq!(s.polygon_mode, PolygonMode::Fill);
    }

    // ── colour maps ──

    #[test]
    fn gradient_colormap_registers_range_uniforms() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(3)).unwrap();

        let mut gradient = GradientColorMap::new();
        gradient.set_values(&[1.0, 4.0, 2.0]);
        gradient.sync(&mut ctx).unwrap();
        p.apply_colormap(&mut ctx, &gradient.colormap(), None).unwrap();

        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert_eq!(ctx.last_uniform("u_value_min"), Some(&UniformValue::Float(1.0)));
        assert_eq!(ctx.last_uniform("u_value_max"), Some(&UniformValue::Float(4.0)));
        assert_eq!(ctx.texture_binds().len(), 1);

        p.detach_colormap(&mut ctx);
        ctx.take_calls();
        p.render(&mut ctx, &frame());
        assert!(!ctx.uniform_binds().contains(&"u_value_max"));
        assert!(ctx.texture_binds().is_empty());
    }

    #[test]
    fn categorical_colormap_uploads_identifiers() {
        let mut ctx = RecordingContext::new();
        let mut p = painter();
        p.set_geometry(&mut ctx, &points(3)).unwrap();

        let ids = [10, 3, 10];
        let mut categorical = CategoricalColorMap::new();
        categorical.count_values(&ids);
        p.apply_colormap(&mut ctx, &categorical.colormap(), Some(&ids)).unwrap();

        let buffer = p.host().buffer(AttributeName::Identifier).unwrap();
        assert_eq!(buffer.length(), 3);
        assert_eq!(buffer.stride(), 1);
        let expected = [1.0f32 / 256.0, 0.0, 1.0 / 256.0];
        assert_eq!(
            ctx.buffer_contents(buffer.id().unwrap()).unwrap(),
            bytemuck::cast_slice::<f32, u8>(&expected)
        );
        assert!(p.texture().is_some());
    }
}
