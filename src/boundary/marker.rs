use crate::geometry::{LayerId, Vertex};

slotmap::new_key_type! {
    /// Unique identifier for a marker in the boundary store.
    pub struct MarkerId;
}

/// Where a marker came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Drawn with the draw-tool adapter; kept in sync with its layer.
    Drawn,
    /// Placed by a map click outside point capture.
    Manual,
    /// Reported by device geolocation.
    DeviceLocation,
    /// Read from a photo's embedded GPS metadata.
    PhotoLocation,
    /// Dropped by an external place search.
    SearchResult,
}

/// A standalone point that is not part of the plot boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// The marker position.
    pub position: Vertex,
    /// Origin of the marker.
    pub kind: MarkerKind,
    /// Adapter layer backing a drawn marker.
    pub layer: Option<LayerId>,
}

impl Marker {
    /// Creates a new marker not backed by an adapter layer.
    #[must_use]
    pub fn new(position: Vertex, kind: MarkerKind) -> Self {
        Self {
            position,
            kind,
            layer: None,
        }
    }

    /// Creates a [`MarkerKind::Drawn`] marker for an adapter point layer.
    #[must_use]
    pub fn drawn(position: Vertex, layer: LayerId) -> Self {
        Self {
            position,
            kind: MarkerKind::Drawn,
            layer: Some(layer),
        }
    }
}
