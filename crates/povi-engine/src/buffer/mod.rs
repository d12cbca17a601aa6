//! Per-vertex attribute storage.

mod attribute;

pub use attribute::{AttributeBuffer, ELEMENT_SIZE};
