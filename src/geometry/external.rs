/// Adapter-native coordinate pair, `[longitude, latitude]` in degrees.
pub type Position = [f64; 2];

/// A geometry as reported by the draw-tool adapter.
///
/// Coordinates use the adapter's `[lng, lat]` order. Polygon rings may or may
/// not repeat their first position at the end.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalGeometry {
    /// A single marker position.
    Point { coord: Position },
    /// An open polyline. Never a plot boundary.
    LineString { coords: Vec<Position> },
    /// Outer boundary followed by holes.
    Polygon { rings: Vec<Vec<Position>> },
    /// Several polygons, each an outer boundary followed by holes.
    MultiPolygon { polygons: Vec<Vec<Vec<Position>>> },
}

impl ExternalGeometry {
    /// Returns the geometry type name, as used in log and error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::LineString { .. } => "LineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
        }
    }
}

/// Identifier the draw-tool adapter assigns to one of its layers.
///
/// Stable for the lifetime of the layer, including across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// One adapter layer with its current geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawLayer {
    pub id: LayerId,
    pub geometry: ExternalGeometry,
}

impl DrawLayer {
    /// Creates a new layer.
    #[must_use]
    pub fn new(id: LayerId, geometry: ExternalGeometry) -> Self {
        Self { id, geometry }
    }
}

/// A callback forwarded by the draw-tool adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// A new layer was drawn.
    Created(DrawLayer),
    /// The listed layers were edited.
    Edited(Vec<DrawLayer>),
    /// One or more layers were deleted; carries every layer still on the map.
    Deleted(Vec<DrawLayer>),
}
