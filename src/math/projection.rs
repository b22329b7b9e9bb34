use super::{Point2, EARTH_MEAN_RADIUS_M};
use crate::geometry::Vertex;

/// Local equirectangular projection from degrees to meters.
///
/// Accurate for plot-sized extents (a few kilometers); distortion grows with
/// distance from the reference latitude.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: Vertex,
    cos_lat: f64,
}

impl LocalProjection {
    /// Creates a projection centered on `origin`.
    #[must_use]
    pub fn new(origin: Vertex) -> Self {
        Self {
            origin,
            cos_lat: origin.lat.to_radians().cos(),
        }
    }

    /// Creates a projection centered on the arithmetic mean of `vertices`.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn centered_on(vertices: &[Vertex]) -> Option<Self> {
        if vertices.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = vertices.len() as f64;
        let (lat_sum, lng_sum) = vertices
            .iter()
            .fold((0.0, 0.0), |(la, ln), v| (la + v.lat, ln + v.lng));
        Some(Self::new(Vertex::new(lat_sum / n, lng_sum / n)))
    }

    /// Projects a vertex to meters east/north of the origin.
    #[must_use]
    pub fn project(&self, vertex: &Vertex) -> Point2 {
        let x = (vertex.lng - self.origin.lng).to_radians() * EARTH_MEAN_RADIUS_M * self.cos_lat;
        let y = (vertex.lat - self.origin.lat).to_radians() * EARTH_MEAN_RADIUS_M;
        Point2::new(x, y)
    }

    /// Projects every vertex of a ring.
    #[must_use]
    pub fn project_all(&self, vertices: &[Vertex]) -> Vec<Point2> {
        vertices.iter().map(|v| self.project(v)).collect()
    }
}
