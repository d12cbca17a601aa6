//! Geometry collections fed to painters.
//!
//! Points and triangles have a fixed vertex count per element and upload as
//! one contiguous block. Line strings and linear rings vary per element and
//! are drawn element by element.

use crate::device::DrawMode;

pub type Vertex = [f32; 3];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GeometryKind {
    Point,
    Triangle,
    LineString,
    LinearRing,
}

impl GeometryKind {
    /// Vertices per element for fixed-size kinds.
    pub fn vertices_per_element(self) -> Option<usize> {
        match self {
            GeometryKind::Point => Some(1),
            GeometryKind::Triangle => Some(3),
            GeometryKind::LineString | GeometryKind::LinearRing => None,
        }
    }

    pub fn draw_mode(self) -> DrawMode {
        match self {
            GeometryKind::Point => DrawMode::Points,
            GeometryKind::Triangle => DrawMode::Triangles,
            GeometryKind::LineString => DrawMode::LineStrip,
            GeometryKind::LinearRing => DrawMode::LineLoop,
        }
    }
}

/// A homogeneous list of geometric elements in 3-D.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryCollection {
    Points(Vec<Vertex>),
    Triangles(Vec<[Vertex; 3]>),
    LineStrings(Vec<Vec<Vertex>>),
    /// Closed rings; the closing vertex is implied, not repeated.
    LinearRings(Vec<Vec<Vertex>>),
}

/// Vertex layout of a collection.
#[derive(Debug, Copy, Clone)]
pub enum GeometryLayout<'a> {
    /// All vertices in one contiguous slice.
    Fixed(&'a [Vertex]),
    /// One vertex list per element.
    Variable(&'a [Vec<Vertex>]),
}

impl GeometryCollection {
    pub fn kind(&self) -> GeometryKind {
        match self {
            GeometryCollection::Points(_) => GeometryKind::Point,
            GeometryCollection::Triangles(_) => GeometryKind::Triangle,
            GeometryCollection::LineStrings(_) => GeometryKind::LineString,
            GeometryCollection::LinearRings(_) => GeometryKind::LinearRing,
        }
    }

    /// Always 3: collections are stored as xyz.
    pub fn dimension(&self) -> usize {
        3
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            GeometryCollection::Points(v) => v.len(),
            GeometryCollection::Triangles(v) => v.len(),
            GeometryCollection::LineStrings(v) | GeometryCollection::LinearRings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vertex_count(&self) -> usize {
        match self.layout() {
            GeometryLayout::Fixed(v) => v.len(),
            GeometryLayout::Variable(elements) => elements.iter().map(Vec::len).sum(),
        }
    }

    pub fn layout(&self) -> GeometryLayout<'_> {
        match self {
            GeometryCollection::Points(v) => GeometryLayout::Fixed(v),
            GeometryCollection::Triangles(v) => GeometryLayout::Fixed(bytemuck::cast_slice(v)),
            GeometryCollection::LineStrings(v) | GeometryCollection::LinearRings(v) => {
                GeometryLayout::Variable(v)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_flatten_to_vertices() {
        let tris = GeometryCollection::Triangles(vec![
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[1.0, 1.0, 0.0], [2.0, 1.0, 0.0], [1.0, 2.0, 0.0]],
        ]);
        assert_eq!(tris.len(), 2);
        assert_eq!(tris.vertex_count(), 6);
        match tris.layout() {
            GeometryLayout::Fixed(v) => assert_eq!(v[3], [1.0, 1.0, 0.0]),
            GeometryLayout::Variable(_) => panic!("triangles are fixed-size"),
        }
    }

    #[test]
    fn rings_are_variable() {
        let rings = GeometryCollection::LinearRings(vec![vec![[0.0; 3]; 4], vec![[1.0; 3]; 3]]);
        assert_eq!(rings.kind().vertices_per_element(), None);
        assert_eq!(rings.kind().draw_mode(), DrawMode::LineLoop);
        assert_eq!(rings.vertex_count(), 7);
    }
}
