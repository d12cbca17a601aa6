use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::device::GraphicsContext;
use crate::render::FrameMatrices;

use super::Drawable;

struct Entry {
    name: String,
    drawable: Weak<RefCell<dyn Drawable>>,
}

/// Named drawables rendered once per frame.
///
/// The scene only observes: owners keep their drawables alive, and an entry
/// whose owner dropped it is pruned instead of drawn.
#[derive(Default)]
pub struct Scene {
    entries: Vec<Entry>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("drawables", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `drawable` under `name`, replacing any entry with that name.
    pub fn add<D: Drawable + 'static>(&mut self, name: impl Into<String>, drawable: &Rc<RefCell<D>>) {
        let name = name.into();
        let strong: Rc<RefCell<dyn Drawable>> = drawable.clone();
        self.entries.retain(|e| e.name != name);
        self.entries.push(Entry {
            name,
            drawable: Rc::downgrade(&strong),
        });
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries whose drawable no longer exists. Returns how many.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.drawable.strong_count() > 0);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            log::debug!("scene pruned {pruned} expired drawables");
        }
        pruned
    }

    /// Renders every live drawable in insertion order. Returns how many ran.
    pub fn render(&mut self, ctx: &mut dyn GraphicsContext, frame: &FrameMatrices) -> usize {
        self.prune();
        let mut rendered = 0;
        for entry in &self.entries {
            let Some(drawable) = entry.drawable.upgrade() else { continue };
            drawable.borrow_mut().render(ctx, frame);
            rendered += 1;
        }
        rendered
    }
}
