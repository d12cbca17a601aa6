//! Core engine-facing contracts.
//!
//! [`Drawable`] is the capability the hosting application drives once per
//! frame; [`Scene`] is the host-side registry of drawables it observes.

mod drawable;
mod scene;

pub use drawable::Drawable;
pub use scene::Scene;
