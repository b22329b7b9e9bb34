pub mod marker;

pub use marker::{Marker, MarkerId, MarkerKind};

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::error::GeometryError;
use crate::geometry::{DrawEvent, DrawLayer, ExternalGeometry, LayerId, Ring, Vertex};
use crate::operations::{extract_ring, AreaMethod, ExtractRing, RingArea};

/// How `on_edited` picks the new boundary when several edited layers are
/// valid polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditTieBreak {
    /// The first valid polygon in the adapter's list wins.
    #[default]
    FirstValid,
    /// The valid polygon with the largest area wins; ties keep list order.
    LargestArea,
}

/// Effect of an event on the authoritative polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonChange {
    /// A new ring became authoritative.
    Replaced,
    /// The authoritative polygon was removed.
    Cleared,
    /// The authoritative polygon is as before.
    Unchanged,
}

/// What a store operation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUpdate {
    /// Effect on the authoritative polygon.
    pub polygon: PolygonChange,
    /// Markers added by the operation.
    pub added_markers: Vec<MarkerId>,
    /// Drawn markers whose position followed their layer.
    pub moved_markers: Vec<MarkerId>,
    /// Markers removed by the operation.
    pub removed_markers: Vec<MarkerId>,
}

impl StoreUpdate {
    fn polygon(polygon: PolygonChange) -> Self {
        Self {
            polygon,
            added_markers: Vec::new(),
            moved_markers: Vec::new(),
            removed_markers: Vec::new(),
        }
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.polygon == PolygonChange::Unchanged
            && self.added_markers.is_empty()
            && self.moved_markers.is_empty()
            && self.removed_markers.is_empty()
    }
}

/// Single source of truth for the plot boundary and its markers.
///
/// Holds at most one authoritative ring. Both the draw-tool adapter events and
/// the point-capture state machine write through this store. Every change to
/// the ring bumps [`revision`](Self::revision).
///
/// Drawn markers are keyed by their adapter [`LayerId`], so a point the user
/// drags keeps its marker.
#[derive(Debug, Default)]
pub struct BoundaryStore {
    polygon: Option<Ring>,
    markers: SlotMap<MarkerId, Marker>,
    revision: u64,
    edit_tie_break: EditTieBreak,
    area_method: AreaMethod,
}

impl BoundaryStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tie-break rule for edit events.
    #[must_use]
    pub fn with_edit_tie_break(mut self, tie_break: EditTieBreak) -> Self {
        self.edit_tie_break = tie_break;
        self
    }

    /// Sets the area method used by [`EditTieBreak::LargestArea`].
    #[must_use]
    pub fn with_area_method(mut self, method: AreaMethod) -> Self {
        self.area_method = method;
        self
    }

    // --- Polygon ---

    /// Returns the authoritative polygon, if any.
    #[must_use]
    pub fn polygon(&self) -> Option<&Ring> {
        self.polygon.as_ref()
    }

    /// Returns a counter that changes whenever the polygon changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Makes `ring` the authoritative polygon.
    pub fn replace_polygon(&mut self, ring: Ring) -> StoreUpdate {
        if self.polygon.as_ref() == Some(&ring) {
            trace!("polygon unchanged");
            return StoreUpdate::polygon(PolygonChange::Unchanged);
        }
        if !ring.is_simple() {
            warn!(
                vertices = ring.vertex_count(),
                "authoritative polygon is self-intersecting"
            );
        }
        debug!(vertices = ring.vertex_count(), "replace authoritative polygon");
        self.polygon = Some(ring);
        self.revision += 1;
        StoreUpdate::polygon(PolygonChange::Replaced)
    }

    /// Removes the authoritative polygon.
    pub fn clear_polygon(&mut self) -> StoreUpdate {
        if self.polygon.take().is_none() {
            return StoreUpdate::polygon(PolygonChange::Unchanged);
        }
        debug!("clear authoritative polygon");
        self.revision += 1;
        StoreUpdate::polygon(PolygonChange::Cleared)
    }

    // --- Markers ---

    /// Inserts a marker and returns its ID.
    pub fn add_marker(&mut self, marker: Marker) -> MarkerId {
        let id = self.markers.insert(marker);
        debug!(
            kind = ?marker.kind,
            lat = marker.position.lat,
            lng = marker.position.lng,
            "add marker"
        );
        id
    }

    /// Returns the marker with the given ID.
    #[must_use]
    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// Returns the drawn marker backed by `layer`, if any.
    #[must_use]
    pub fn drawn_marker(&self, layer: LayerId) -> Option<(MarkerId, &Marker)> {
        self.markers.iter().find(|(_, m)| m.layer == Some(layer))
    }

    /// Removes and returns the marker with the given ID.
    pub fn remove_marker(&mut self, id: MarkerId) -> Option<Marker> {
        self.markers.remove(id)
    }

    /// Removes every marker.
    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    /// Iterates all markers.
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &Marker)> + '_ {
        self.markers.iter()
    }

    /// Returns the number of markers.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    // --- Draw-tool adapter events ---

    /// Dispatches an adapter event to the matching handler.
    ///
    /// # Errors
    ///
    /// Returns an error only for a `Created` event whose geometry is neither a
    /// usable polygon nor a valid point.
    pub fn apply(&mut self, event: &DrawEvent) -> Result<StoreUpdate, GeometryError> {
        match event {
            DrawEvent::Created(layer) => self.on_created(layer),
            DrawEvent::Edited(changed) => Ok(self.on_edited(changed)),
            DrawEvent::Deleted(remaining) => Ok(self.on_deleted(remaining)),
        }
    }

    /// Handles a newly drawn layer.
    ///
    /// A polygon replaces the authoritative polygon; a point becomes the
    /// [`MarkerKind::Drawn`] marker for its layer.
    ///
    /// # Errors
    ///
    /// Returns the normalization error when the geometry yields neither; the
    /// store is left untouched.
    pub fn on_created(&mut self, layer: &DrawLayer) -> Result<StoreUpdate, GeometryError> {
        if let ExternalGeometry::Point { coord } = &layer.geometry {
            let position = Vertex::from_position(*coord).validated()?;
            let mut update = StoreUpdate::polygon(PolygonChange::Unchanged);
            self.sync_drawn_marker(layer.id, position, &mut update);
            return Ok(update);
        }
        match ExtractRing::new(&layer.geometry).execute() {
            Ok(ring) => Ok(self.replace_polygon(ring)),
            Err(err) => {
                warn!(
                    layer = layer.id.0,
                    kind = layer.geometry.kind(),
                    error = %err,
                    "created geometry rejected"
                );
                Err(err)
            }
        }
    }

    /// Handles edited layers.
    ///
    /// The winning valid polygon, chosen by the configured [`EditTieBreak`],
    /// replaces the authoritative polygon; with no valid polygon the ring is
    /// kept. Edited point layers move their drawn markers.
    pub fn on_edited(&mut self, changed: &[DrawLayer]) -> StoreUpdate {
        let mut rings = changed.iter().filter_map(|layer| extract_ring(&layer.geometry));
        let winner = match self.edit_tie_break {
            EditTieBreak::FirstValid => rings.next(),
            EditTieBreak::LargestArea => largest_ring(rings, self.area_method),
        };
        let mut update = match winner {
            Some(ring) => self.replace_polygon(ring),
            None => {
                debug!(changed = changed.len(), "edit produced no usable polygon");
                StoreUpdate::polygon(PolygonChange::Unchanged)
            }
        };
        self.sync_point_layers(changed, &mut update);
        update
    }

    /// Handles a delete by rescanning every layer still on the map.
    ///
    /// The first remaining valid polygon becomes authoritative; with none left
    /// the polygon is cleared. Drawn markers whose layer is gone are removed
    /// and the rest are brought in line with their layer.
    pub fn on_deleted(&mut self, remaining: &[DrawLayer]) -> StoreUpdate {
        let mut update = match remaining
            .iter()
            .find_map(|layer| extract_ring(&layer.geometry))
        {
            Some(ring) => self.replace_polygon(ring),
            None => self.clear_polygon(),
        };

        let gone: Vec<MarkerId> = self
            .markers
            .iter()
            .filter(|(_, marker)| {
                marker
                    .layer
                    .is_some_and(|layer| !remaining.iter().any(|l| l.id == layer && is_point(l)))
            })
            .map(|(id, _)| id)
            .collect();
        for id in &gone {
            self.markers.remove(*id);
        }
        if !gone.is_empty() {
            debug!(removed = gone.len(), "drop deleted drawn markers");
        }
        update.removed_markers = gone;

        self.sync_point_layers(remaining, &mut update);
        update
    }

    fn sync_point_layers(&mut self, layers: &[DrawLayer], update: &mut StoreUpdate) {
        for layer in layers {
            let ExternalGeometry::Point { coord } = &layer.geometry else {
                continue;
            };
            match Vertex::from_position(*coord).validated() {
                Ok(position) => self.sync_drawn_marker(layer.id, position, update),
                Err(err) => warn!(layer = layer.id.0, error = %err, "ignoring invalid point layer"),
            }
        }
    }

    fn sync_drawn_marker(&mut self, layer: LayerId, position: Vertex, update: &mut StoreUpdate) {
        let existing = self
            .markers
            .iter_mut()
            .find(|(_, marker)| marker.layer == Some(layer));
        match existing {
            Some((id, marker)) => {
                if !marker.position.coincides_with(&position) {
                    debug!(
                        layer = layer.0,
                        lat = position.lat,
                        lng = position.lng,
                        "move drawn marker"
                    );
                    marker.position = position;
                    update.moved_markers.push(id);
                }
            }
            None => {
                let id = self.add_marker(Marker::drawn(position, layer));
                update.added_markers.push(id);
            }
        }
    }
}

fn is_point(layer: &DrawLayer) -> bool {
    matches!(layer.geometry, ExternalGeometry::Point { .. })
}

fn largest_ring(candidates: impl Iterator<Item = Ring>, method: AreaMethod) -> Option<Ring> {
    let mut best: Option<(f64, Ring)> = None;
    for ring in candidates {
        let area = RingArea::of_ring(&ring).with_method(method).execute().square_meters();
        let better = match &best {
            Some((best_area, _)) => area > *best_area,
            None => true,
        };
        if better {
            best = Some((area, ring));
        }
    }
    best.map(|(_, ring)| ring)
}
