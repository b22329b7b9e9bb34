use tracing::debug;

use crate::boundary::{BoundaryStore, StoreUpdate};
use crate::error::{CaptureError, Result};
use crate::geometry::ring::MIN_RING_VERTICES;
use crate::geometry::{Ring, Vertex};
use crate::operations::{AreaMeasure, AreaMethod, RingArea};

/// Point-capture mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Not capturing; map clicks place markers.
    #[default]
    Idle,
    /// Map clicks append boundary vertices.
    Capturing,
}

/// Builds a boundary from explicitly placed, ordered vertices.
///
/// Runs independently of the draw-tool adapter. A successful
/// [`finish`](Self::finish) writes the ring through the [`BoundaryStore`], so
/// whichever producer writes last owns the polygon.
#[derive(Debug, Default)]
pub struct PointCapture {
    state: CaptureState,
    points: Vec<Vertex>,
}

impl PointCapture {
    /// Creates an idle capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Returns `true` while capturing.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    /// Returns the points placed so far, in order.
    #[must_use]
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    /// Enters capture mode with an empty point sequence.
    ///
    /// Calling this while already capturing restarts the sequence.
    pub fn start(&mut self) {
        if self.is_capturing() {
            debug!(discarded = self.points.len(), "restart point capture");
        } else {
            debug!("start point capture");
        }
        self.points.clear();
        self.state = CaptureState::Capturing;
    }

    /// Appends a vertex and returns the new point count.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::NotCapturing` outside capture mode, or
    /// `GeometryError::InvalidCoordinate` for an out-of-range vertex.
    pub fn add_point(&mut self, vertex: Vertex) -> Result<usize> {
        self.ensure_capturing()?;
        self.points.push(vertex.validated()?);
        debug!(count = self.points.len(), lat = vertex.lat, lng = vertex.lng, "capture point");
        Ok(self.points.len())
    }

    /// Removes the most recently placed point.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::NotCapturing` outside capture mode.
    pub fn undo_last_point(&mut self) -> std::result::Result<Option<Vertex>, CaptureError> {
        self.ensure_capturing()?;
        Ok(self.points.pop())
    }

    /// Converts the placed points into the authoritative polygon.
    ///
    /// On success the sequence is cleared and the machine returns to idle. On
    /// failure the state and points are kept so the user can keep adding.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::NotCapturing` outside capture mode,
    /// `CaptureError::TooShort` with fewer than three points, or a
    /// `GeometryError` if the points do not form a ring.
    pub fn finish(&mut self, store: &mut BoundaryStore) -> Result<StoreUpdate> {
        self.ensure_capturing()?;
        let count = self.points.len();
        if count < MIN_RING_VERTICES {
            debug!(count, "capture too short to finish");
            return Err(CaptureError::TooShort { count }.into());
        }
        let ring = Ring::new(self.points.clone())?;
        let update = store.replace_polygon(ring);
        self.points.clear();
        self.state = CaptureState::Idle;
        debug!(count, "finish point capture");
        Ok(update)
    }

    /// Leaves capture mode, discarding the placed points.
    ///
    /// Returns the number of discarded points.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::NotCapturing` outside capture mode.
    pub fn cancel(&mut self) -> std::result::Result<usize, CaptureError> {
        self.ensure_capturing()?;
        let discarded = self.points.len();
        self.points.clear();
        self.state = CaptureState::Idle;
        debug!(discarded, "cancel point capture");
        Ok(discarded)
    }

    /// Area enclosed by the points placed so far, for live display.
    #[must_use]
    pub fn preview_area(&self, method: AreaMethod) -> AreaMeasure {
        RingArea::new(&self.points).with_method(method).execute()
    }

    fn ensure_capturing(&self) -> std::result::Result<(), CaptureError> {
        if self.is_capturing() {
            Ok(())
        } else {
            Err(CaptureError::NotCapturing)
        }
    }
}
