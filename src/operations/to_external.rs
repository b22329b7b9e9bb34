use crate::geometry::{ExternalGeometry, Ring, Vertex};

/// Converts engine geometry back to the adapter's representation.
///
/// Rings are emitted as a closed `[lng, lat]` polygon without holes so the UI
/// can re-render what the engine currently holds.
pub struct ToExternal;

impl ToExternal {
    /// Converts a ring to an adapter polygon.
    #[must_use]
    pub fn ring(ring: &Ring) -> ExternalGeometry {
        let positions = ring.closed().map(|v| v.to_position()).collect();
        ExternalGeometry::Polygon {
            rings: vec![positions],
        }
    }

    /// Converts a vertex to an adapter point.
    #[must_use]
    pub fn vertex(vertex: Vertex) -> ExternalGeometry {
        ExternalGeometry::Point {
            coord: vertex.to_position(),
        }
    }
}
