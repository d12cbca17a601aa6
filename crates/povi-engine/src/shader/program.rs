use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::device::{GraphicsContext, ProgramId, ShaderStage, UniformLocation};
use crate::error::{GlooError, Result};
use crate::names::AttributeName;
use crate::uniform::UniformValue;

use super::ShaderSourceLoader;

pub type SharedShader = Rc<RefCell<ShaderProgram>>;

/// Lifecycle of a [`ShaderProgram`].
///
/// `Linked` stays in place across a failed rebuild: the previous program
/// keeps serving until a new one links.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderState {
    Unbuilt,
    Built,
    Linked,
    Failed,
}

pub struct ShaderProgram {
    loader: Rc<dyn ShaderSourceLoader>,
    sources: Vec<String>,

    program: Option<ProgramId>,
    pending: Option<ProgramId>,
    state: ShaderState,
    generation: u64,

    attributes: HashMap<AttributeName, u32>,
    uniforms: HashMap<String, UniformLocation>,
    missing: BTreeSet<String>,
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("sources", &self.sources)
            .field("program", &self.program)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl ShaderProgram {
    pub fn new(loader: Rc<dyn ShaderSourceLoader>) -> Self {
        Self {
            loader,
            sources: Vec::new(),
            program: None,
            pending: None,
            state: ShaderState::Unbuilt,
            generation: 0,
            attributes: HashMap::new(),
            uniforms: HashMap::new(),
            missing: BTreeSet::new(),
        }
    }

    pub fn with_sources<I, S>(loader: Rc<dyn ShaderSourceLoader>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut shader = Self::new(loader);
        shader.sources = sources.into_iter().map(Into::into).collect();
        shader
    }

    pub fn into_shared(self) -> SharedShader {
        Rc::new(RefCell::new(self))
    }

    // ── sources ──

    /// Appends a source identifier. Takes effect at the next build.
    pub fn attach(&mut self, source_id: impl Into<String>) {
        self.sources.push(source_id.into());
    }

    /// Replaces the source list. Takes effect at the next build.
    pub fn set_sources<I, S>(&mut self, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    // ── lifecycle ──

    #[inline]
    pub fn state(&self) -> ShaderState {
        self.state
    }

    /// True once a program has linked; stays true across failed rebuilds.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.program.is_some()
    }

    /// True until the first build attempt, successful or not.
    #[inline]
    pub fn needs_init(&self) -> bool {
        self.state == ShaderState::Unbuilt
    }

    /// Bumped on every successful link. Consumers holding per-program state
    /// (attribute pointers) compare against it to know when to rewire.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    fn mark_failed(&mut self) {
        self.state = if self.program.is_some() {
            ShaderState::Linked
        } else {
            ShaderState::Failed
        };
    }

    /// Compiles every source into a fresh program object, ready to link.
    ///
    /// Stage inference and source loading happen before any GPU object is
    /// created. Compile failures are logged with the source id; the link that
    /// follows then fails.
    pub fn build(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        if let Some(stale) = self.pending.take() {
            ctx.delete_program(stale);
        }

        let resolved: Result<Vec<_>> = self
            .sources
            .iter()
            .map(|source_id| -> Result<(String, ShaderStage, String)> {
                let stage = ShaderStage::from_source_id(source_id).ok_or_else(|| {
                    GlooError::UnknownShaderStage {
                        source_id: source_id.clone(),
                    }
                })?;
                let text = self
                    .loader
                    .load(source_id)
                    .map_err(|source| GlooError::ShaderSource {
                        source_id: source_id.clone(),
                        source,
                    })?;
                Ok((source_id.clone(), stage, text))
            })
            .collect();
        let stages = match resolved {
            Ok(stages) => stages,
            Err(e) => {
                self.mark_failed();
                return Err(e);
            }
        };

        let program = match ctx.create_program() {
            Ok(program) => program,
            Err(e) => {
                self.mark_failed();
                return Err(e);
            }
        };
        for (source_id, stage, text) in &stages {
            let shader = match ctx.create_shader(*stage) {
                Ok(shader) => shader,
                Err(e) => {
                    ctx.delete_program(program);
                    self.mark_failed();
                    return Err(e);
                }
            };
            if let Err(info) = ctx.compile_shader(shader, text) {
                log::error!("{source_id}\n{info}");
            }
            ctx.attach_shader(program, shader);
            ctx.delete_shader(shader);
        }

        self.pending = Some(program);
        if self.program.is_none() {
            self.state = ShaderState::Built;
        }
        Ok(())
    }

    /// Links the program produced by [`build`](Self::build).
    ///
    /// On success the previous program (if any) is deleted and replaced. On
    /// failure the new object is discarded and the previous program, if one
    /// exists, stays active.
    pub fn link(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        let Some(candidate) = self.pending.take() else {
            return Err(GlooError::ShaderNotLinked);
        };

        if let Err(log) = ctx.link_program(candidate) {
            ctx.delete_program(candidate);
            self.mark_failed();
            log::error!("shader {:?} failed to link:\n{log}", self.sources);
            return Err(GlooError::ShaderLinkFailed { log });
        }

        if let Some(old) = self.program.replace(candidate) {
            ctx.delete_program(old);
        }
        self.resolve_interface(ctx, candidate);
        self.generation += 1;
        self.state = ShaderState::Linked;
        log::debug!(
            "shader {:?} linked as {candidate:?} (generation {})",
            self.sources,
            self.generation
        );
        Ok(())
    }

    /// Builds and links.
    pub fn init(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        self.build(ctx)?;
        self.link(ctx)
    }

    /// Rebuilds from the current sources, e.g. after shader files changed.
    /// A failure leaves the previously linked program in service.
    pub fn reload(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        log::info!("reloading shader {:?}", self.sources);
        self.init(ctx)
    }

    fn resolve_interface(&mut self, ctx: &mut dyn GraphicsContext, program: ProgramId) {
        self.attributes = AttributeName::ALL
            .iter()
            .filter_map(|name| Some((*name, ctx.attribute_location(program, name.as_str())?)))
            .collect();
        self.uniforms = ctx.active_uniforms(program).into_iter().collect();
        self.missing.clear();
    }

    // ── use ──

    /// Makes this program current. Returns false when nothing is linked.
    pub fn activate(&self, ctx: &mut dyn GraphicsContext) -> bool {
        match self.program {
            Some(program) => {
                ctx.use_program(Some(program));
                true
            }
            None => false,
        }
    }

    pub fn deactivate(&self, ctx: &mut dyn GraphicsContext) {
        ctx.use_program(None);
    }

    /// Resolved location of `name`, `None` if the program does not use it.
    pub fn attribute_location(&mut self, name: AttributeName) -> Option<u32> {
        self.program?;
        let location = self.attributes.get(&name).copied();
        if location.is_none() {
            self.note_missing(name.as_str());
        }
        location
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
    }

    /// Uploads `value` to uniform `name`. The program must be active.
    pub fn bind(&mut self, ctx: &mut dyn GraphicsContext, name: &str, value: UniformValue) {
        if self.program.is_none() {
            return;
        }
        match self.uniforms.get(name) {
            Some(location) => ctx.set_uniform(*location, &value),
            None => self.note_missing(name),
        }
    }

    fn note_missing(&mut self, name: &str) {
        if self.missing.insert(name.to_string()) {
            log::warn!(
                "shader {:?}: `{name}` is not an active input; binding ignored",
                self.sources
            );
        }
    }

    /// Names that were bound but are not part of the linked interface.
    pub fn missing_bindings(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(String::as_str)
    }

    /// Deletes GPU objects. The source list is kept; a later `init` rebuilds.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(program) = self.pending.take() {
            ctx.delete_program(program);
        }
        if let Some(program) = self.program.take() {
            ctx.delete_program(program);
        }
        self.attributes.clear();
        self.uniforms.clear();
        self.state = ShaderState::Unbuilt;
    }
}
