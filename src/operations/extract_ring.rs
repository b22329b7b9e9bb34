use tracing::trace;

use crate::error::GeometryError;
use crate::geometry::ring::MIN_RING_VERTICES;
use crate::geometry::{ExternalGeometry, Position, Ring, Vertex};

/// Extracts the plot boundary ring from an adapter geometry.
///
/// Only the first ring of the first polygon is used; holes and additional
/// polygons are dropped. Coordinates are swapped from `[lng, lat]` to
/// [`Vertex`] order and an explicit closing position is removed.
pub struct ExtractRing<'a> {
    geometry: &'a ExternalGeometry,
}

impl<'a> ExtractRing<'a> {
    /// Creates a new `ExtractRing` operation.
    #[must_use]
    pub fn new(geometry: &'a ExternalGeometry) -> Self {
        Self { geometry }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::UnsupportedGeometry` for points and polylines,
    /// and the ring validation error when the boundary is degenerate.
    pub fn execute(&self) -> Result<Ring, GeometryError> {
        let outer = match self.geometry {
            ExternalGeometry::Polygon { rings } => rings.first(),
            ExternalGeometry::MultiPolygon { polygons } => {
                polygons.first().and_then(|rings| rings.first())
            }
            ExternalGeometry::Point { .. } | ExternalGeometry::LineString { .. } => {
                return Err(GeometryError::UnsupportedGeometry(self.geometry.kind()));
            }
        };
        let Some(outer) = outer else {
            return Err(GeometryError::TooFewVertices {
                found: 0,
                required: MIN_RING_VERTICES,
            });
        };
        ring_from_positions(outer)
    }
}

/// Like [`ExtractRing`], but maps every rejection to `None`.
#[must_use]
pub fn extract_ring(geometry: &ExternalGeometry) -> Option<Ring> {
    match ExtractRing::new(geometry).execute() {
        Ok(ring) => Some(ring),
        Err(err) => {
            trace!(kind = geometry.kind(), error = %err, "geometry produced no ring");
            None
        }
    }
}

fn ring_from_positions(positions: &[Position]) -> Result<Ring, GeometryError> {
    Ring::new(positions.iter().copied().map(Vertex::from_position).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square_positions(closed: bool) -> Vec<Position> {
        let mut ring = vec![[73.0, 18.0], [73.001, 18.0], [73.001, 18.001], [73.0, 18.001]];
        if closed {
            ring.push([73.0, 18.0]);
        }
        ring
    }

    #[test]
    fn polygon_swaps_to_lat_lng() {
        let geometry = ExternalGeometry::Polygon {
            rings: vec![square_positions(true)],
        };
        let ring = ExtractRing::new(&geometry).execute().unwrap();
        assert_eq!(ring.vertex_count(), 4);
        assert_eq!(ring.vertices()[1], Vertex::new(18.0, 73.001));
    }

    #[test]
    fn open_and_closed_sources_agree() {
        let open = ExternalGeometry::Polygon {
            rings: vec![square_positions(false)],
        };
        let closed = ExternalGeometry::Polygon {
            rings: vec![square_positions(true)],
        };
        assert_eq!(extract_ring(&open), extract_ring(&closed));
    }

    #[test]
    fn holes_are_ignored() {
        let hole = vec![[73.0002, 18.0002], [73.0004, 18.0002], [73.0004, 18.0004]];
        let geometry = ExternalGeometry::Polygon {
            rings: vec![square_positions(true), hole],
        };
        let ring = extract_ring(&geometry).unwrap();
        assert_eq!(ring.vertex_count(), 4);
    }

    #[test]
    fn multipolygon_uses_first_polygon() {
        let second = vec![[10.0, 10.0], [10.1, 10.0], [10.1, 10.1]];
        let geometry = ExternalGeometry::MultiPolygon {
            polygons: vec![vec![square_positions(false)], vec![second]],
        };
        let ring = extract_ring(&geometry).unwrap();
        assert_eq!(ring.vertices()[0], Vertex::new(18.0, 73.0));
    }

    #[test]
    fn point_is_rejected() {
        let geometry = ExternalGeometry::Point {
            coord: [73.0, 18.0],
        };
        assert_eq!(
            ExtractRing::new(&geometry).execute().unwrap_err(),
            GeometryError::UnsupportedGeometry("Point")
        );
    }

    #[test]
    fn linestring_is_rejected() {
        let geometry = ExternalGeometry::LineString {
            coords: square_positions(false),
        };
        assert!(extract_ring(&geometry).is_none());
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let geometry = ExternalGeometry::Polygon {
            rings: vec![vec![[73.0, 18.0], [73.001, 18.0], [73.0, 18.0]]],
        };
        assert!(matches!(
            ExtractRing::new(&geometry).execute(),
            Err(GeometryError::TooFewVertices { found: 2, .. })
        ));
    }

    #[test]
    fn empty_polygon_is_rejected() {
        let geometry = ExternalGeometry::Polygon { rings: vec![] };
        assert!(extract_ring(&geometry).is_none());
        let geometry = ExternalGeometry::MultiPolygon { polygons: vec![] };
        assert!(extract_ring(&geometry).is_none());
    }
}
