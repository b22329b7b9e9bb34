use geo::orient::Direction;
use geo::{Coord, GeodesicArea, LineString, Orient, Polygon};

use crate::geometry::ring::{open_ring, MIN_RING_VERTICES};
use crate::geometry::{Ring, Vertex};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::projection::LocalProjection;

/// Square meters in one hectare.
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Square meters in one international acre.
pub const SQUARE_METERS_PER_ACRE: f64 = 4_046.856_42;

/// Algorithm used to measure a ring on the earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaMethod {
    /// Ellipsoidal geodesic area (WGS84).
    #[default]
    Geodesic,
    /// Shoelace formula in a local equirectangular projection on a sphere.
    ProjectedShoelace,
}

/// An area measurement. Sign follows the ring's winding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AreaMeasure {
    signed_square_meters: f64,
}

impl AreaMeasure {
    /// The area of an empty or degenerate ring.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Creates a measure from a signed value in square meters.
    #[must_use]
    pub fn from_signed_square_meters(signed_square_meters: f64) -> Self {
        Self {
            signed_square_meters,
        }
    }

    /// Signed area; positive when the ring runs counter-clockwise on the map.
    #[must_use]
    pub fn signed_square_meters(&self) -> f64 {
        self.signed_square_meters
    }

    /// Area magnitude in square meters.
    #[must_use]
    pub fn square_meters(&self) -> f64 {
        self.signed_square_meters.abs()
    }

    /// Area magnitude in hectares.
    #[must_use]
    pub fn hectares(&self) -> f64 {
        hectares_from_square_meters(self.square_meters())
    }

    /// Area magnitude in acres.
    #[must_use]
    pub fn acres(&self) -> f64 {
        acres_from_square_meters(self.square_meters())
    }
}

/// Converts square meters to hectares.
#[must_use]
pub fn hectares_from_square_meters(square_meters: f64) -> f64 {
    square_meters / SQUARE_METERS_PER_HECTARE
}

/// Converts square meters to acres.
#[must_use]
pub fn acres_from_square_meters(square_meters: f64) -> f64 {
    square_meters / SQUARE_METERS_PER_ACRE
}

/// Computes the surface area enclosed by a ring of geographic vertices.
///
/// The ring is closed internally; an explicit closing vertex in the input is
/// accepted and does not change the result. Fewer than three vertices
/// measure zero.
pub struct RingArea<'a> {
    vertices: &'a [Vertex],
    method: AreaMethod,
}

impl<'a> RingArea<'a> {
    /// Creates a new `RingArea` query using the geodesic method.
    #[must_use]
    pub fn new(vertices: &'a [Vertex]) -> Self {
        Self {
            vertices,
            method: AreaMethod::default(),
        }
    }

    /// Creates a query for a stored ring.
    #[must_use]
    pub fn of_ring(ring: &'a Ring) -> Self {
        Self::new(ring.vertices())
    }

    /// Creates a query for an optional ring; `None` measures zero.
    #[must_use]
    pub fn of_polygon(polygon: Option<&'a Ring>) -> Self {
        Self::new(polygon.map_or(&[][..], Ring::vertices))
    }

    /// Selects the measuring algorithm.
    #[must_use]
    pub fn with_method(mut self, method: AreaMethod) -> Self {
        self.method = method;
        self
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self) -> AreaMeasure {
        let open = open_ring(self.vertices);
        if open.len() < MIN_RING_VERTICES {
            return AreaMeasure::zero();
        }
        let Some(proj) = LocalProjection::centered_on(open) else {
            return AreaMeasure::zero();
        };
        let planar = signed_area_2d(&proj.project_all(open));

        let signed = match self.method {
            AreaMethod::ProjectedShoelace => planar,
            AreaMethod::Geodesic => {
                let magnitude = geodesic_area(open);
                if planar < 0.0 {
                    -magnitude
                } else {
                    magnitude
                }
            }
        };
        AreaMeasure::from_signed_square_meters(signed)
    }
}

fn geodesic_area(open: &[Vertex]) -> f64 {
    let coords: Vec<Coord<f64>> = open
        .iter()
        .map(|v| Coord { x: v.lng, y: v.lat })
        .collect();
    // Polygon::new closes the exterior ring.
    let polygon = Polygon::new(LineString::from(coords), vec![]).orient(Direction::Default);
    polygon.geodesic_area_unsigned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::EARTH_MEAN_RADIUS_M;
    use approx::assert_relative_eq;

    /// Counter-clockwise box of `width_m` x `height_m` anchored at `origin`.
    fn rectangle(origin: Vertex, width_m: f64, height_m: f64) -> Vec<Vertex> {
        let dlat = (height_m / EARTH_MEAN_RADIUS_M).to_degrees();
        let dlng = (width_m / (EARTH_MEAN_RADIUS_M * origin.lat.to_radians().cos())).to_degrees();
        vec![
            origin,
            Vertex::new(origin.lat, origin.lng + dlng),
            Vertex::new(origin.lat + dlat, origin.lng + dlng),
            Vertex::new(origin.lat + dlat, origin.lng),
        ]
    }

    fn both_methods() -> [AreaMethod; 2] {
        [AreaMethod::Geodesic, AreaMethod::ProjectedShoelace]
    }

    #[test]
    fn rectangle_matches_width_times_height() {
        for lat in [0.0, 18.5, 45.0, 60.0] {
            let ring = rectangle(Vertex::new(lat, 10.0), 200.0, 100.0);
            for method in both_methods() {
                let area = RingArea::new(&ring).with_method(method).execute();
                let expected = 20_000.0;
                assert!(
                    (area.square_meters() - expected).abs() / expected < 0.02,
                    "{method:?} at lat {lat}: expected ~{expected}, got {}",
                    area.square_meters()
                );
            }
        }
    }

    #[test]
    fn reversed_ring_has_same_magnitude() {
        let ring = vec![
            Vertex::new(18.520, 73.850),
            Vertex::new(18.521, 73.853),
            Vertex::new(18.523, 73.852),
            Vertex::new(18.522, 73.849),
            Vertex::new(18.5215, 73.8505),
        ];
        let mut reversed = ring.clone();
        reversed.reverse();
        for method in both_methods() {
            let forward = RingArea::new(&ring).with_method(method).execute();
            let backward = RingArea::new(&reversed).with_method(method).execute();
            assert_relative_eq!(
                forward.square_meters(),
                backward.square_meters(),
                max_relative = 1e-9
            );
            assert!(forward.signed_square_meters() * backward.signed_square_meters() < 0.0);
        }
    }

    #[test]
    fn closing_vertex_does_not_change_area() {
        let open = rectangle(Vertex::new(30.0, -97.0), 50.0, 80.0);
        let mut closed = open.clone();
        closed.push(open[0]);
        for method in both_methods() {
            let a = RingArea::new(&open).with_method(method).execute();
            let b = RingArea::new(&closed).with_method(method).execute();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn counter_clockwise_is_positive() {
        let ring = rectangle(Vertex::new(10.0, 10.0), 100.0, 100.0);
        let area = RingArea::new(&ring).execute();
        assert!(area.signed_square_meters() > 0.0);
    }

    #[test]
    fn fewer_than_three_vertices_is_zero() {
        let ring = vec![Vertex::new(0.0, 0.0), Vertex::new(0.0, 1.0)];
        assert_eq!(RingArea::new(&ring).execute(), AreaMeasure::zero());
        assert_eq!(RingArea::new(&[]).execute(), AreaMeasure::zero());
        assert_eq!(RingArea::of_polygon(None).execute(), AreaMeasure::zero());
    }

    #[test]
    fn unit_conversions() {
        let area = AreaMeasure::from_signed_square_meters(-40_468.5642);
        assert_relative_eq!(area.square_meters(), 40_468.5642);
        assert_relative_eq!(area.hectares(), 4.046_856_42, max_relative = 1e-12);
        assert_relative_eq!(area.acres(), 10.0, max_relative = 1e-12);
    }

    #[test]
    fn of_ring_matches_slice() {
        let vertices = rectangle(Vertex::new(5.0, 5.0), 30.0, 40.0);
        let ring = Ring::new(vertices.clone()).unwrap();
        assert_eq!(RingArea::of_ring(&ring).execute(), RingArea::new(&vertices).execute());
    }
}
