use crate::error::GeometryError;
use crate::math::TOLERANCE;

use super::external::Position;

/// A geographic position in degrees, latitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl Vertex {
    /// Creates a new vertex.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a vertex from an adapter `[lng, lat]` pair.
    #[must_use]
    pub fn from_position(position: Position) -> Self {
        Self {
            lat: position[1],
            lng: position[0],
        }
    }

    /// Returns the adapter `[lng, lat]` pair for this vertex.
    #[must_use]
    pub fn to_position(self) -> Position {
        [self.lng, self.lat]
    }

    /// Returns `true` if both components are finite and in range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns the vertex unchanged if it is valid.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidCoordinate` for non-finite or out-of-range
    /// components.
    pub fn validated(self) -> Result<Self, GeometryError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeometryError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// Returns `true` if both components are within [`TOLERANCE`] degrees.
    #[must_use]
    pub fn coincides_with(&self, other: &Vertex) -> bool {
        (self.lat - other.lat).abs() < TOLERANCE && (self.lng - other.lng).abs() < TOLERANCE
    }
}
