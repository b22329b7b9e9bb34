use crate::error::GeometryError;
use crate::math::polygon_2d::has_self_intersection;
use crate::math::projection::LocalProjection;

use super::Vertex;

/// Minimum number of distinct vertices for a ring to enclose an area.
pub const MIN_RING_VERTICES: usize = 3;

/// One closed polygon boundary, stored open.
///
/// The last vertex implicitly connects back to the first; a trailing copy of
/// the first vertex is stripped on construction. A `Ring` always holds at
/// least [`MIN_RING_VERTICES`] distinct, valid vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    vertices: Vec<Vertex>,
}

impl Ring {
    /// Creates a ring from an ordered vertex list.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidCoordinate` if any vertex is out of range,
    /// or `GeometryError::TooFewVertices` if fewer than three distinct
    /// vertices remain.
    pub fn new(mut vertices: Vec<Vertex>) -> Result<Self, GeometryError> {
        for v in &vertices {
            v.validated()?;
        }
        let open_len = open_ring(&vertices).len();
        vertices.truncate(open_len);

        let found = distinct_vertex_count(&vertices);
        if found < MIN_RING_VERTICES {
            return Err(GeometryError::TooFewVertices {
                found,
                required: MIN_RING_VERTICES,
            });
        }
        Ok(Self { vertices })
    }

    /// Returns the ordered vertices, without the closing vertex.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of stored vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Iterates the vertices followed by the first vertex again.
    pub fn closed(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().chain(self.vertices.first())
    }

    /// Returns the same boundary traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }

    /// Returns `true` if no two non-adjacent edges cross.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        let Some(proj) = LocalProjection::centered_on(&self.vertices) else {
            return true;
        };
        !has_self_intersection(&proj.project_all(&self.vertices))
    }

    /// Consumes the ring, returning its vertices.
    #[must_use]
    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

/// Returns `vertices` without trailing copies of the first vertex.
#[must_use]
pub fn open_ring(vertices: &[Vertex]) -> &[Vertex] {
    let Some(first) = vertices.first() else {
        return vertices;
    };
    let mut end = vertices.len();
    while end > 1 && vertices[end - 1].coincides_with(first) {
        end -= 1;
    }
    &vertices[..end]
}

/// Counts vertices that do not coincide with any earlier vertex.
#[must_use]
pub fn distinct_vertex_count(vertices: &[Vertex]) -> usize {
    vertices
        .iter()
        .enumerate()
        .filter(|(i, v)| !vertices[..*i].iter().any(|prev| prev.coincides_with(v)))
        .count()
}
