use chrono::{DateTime, Utc};

use crate::boundary::Marker;
use crate::geometry::Vertex;
use crate::location::Provenance;
use crate::operations::{acres_from_square_meters, hectares_from_square_meters};

/// Caller-supplied plot details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotMetadata {
    /// Plot name; required.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Area as declared by the user, kept verbatim.
    pub declared_area: String,
}

impl PlotMetadata {
    /// Creates metadata with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the user-declared area string.
    #[must_use]
    pub fn with_declared_area(mut self, declared_area: impl Into<String>) -> Self {
        self.declared_area = declared_area.into();
        self
    }
}

/// The assembled submission payload for one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRecord {
    pub name: String,
    pub description: String,
    pub declared_area: String,
    /// Area of `boundary` at build time, in square meters.
    pub area_square_meters: f64,
    /// Authoritative boundary, open; empty when no polygon was captured.
    pub boundary: Vec<Vertex>,
    pub markers: Vec<Marker>,
    pub provenance: Provenance,
    pub submitted_at: DateTime<Utc>,
}

impl PlotRecord {
    /// Computed area in hectares.
    #[must_use]
    pub fn area_hectares(&self) -> f64 {
        hectares_from_square_meters(self.area_square_meters)
    }

    /// Computed area in acres.
    #[must_use]
    pub fn area_acres(&self) -> f64 {
        acres_from_square_meters(self.area_square_meters)
    }

    /// Returns `true` if a boundary was captured.
    #[must_use]
    pub fn has_boundary(&self) -> bool {
        !self.boundary.is_empty()
    }
}
