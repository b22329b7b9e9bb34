use std::cell::Cell;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::boundary::{BoundaryStore, Marker, MarkerId, MarkerKind, StoreUpdate};
use crate::capture::PointCapture;
use crate::config::EngineConfig;
use crate::error::{CaptureError, GeolocationError, Result};
use crate::geometry::{DrawEvent, Vertex};
use crate::location::{
    GeolocationSource, LocationOutcome, LocationResolver, PhotoGpsReader, Provenance,
    RequestToken,
};
use crate::operations::{AreaMeasure, BuildPlotRecord, RingArea};
use crate::record::{PlotMetadata, PlotRecord};

/// What a map click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Appended a capture point; carries the new point count.
    CapturePoint { count: usize },
    /// Placed a manual marker; `anchored` is `true` if it also became the
    /// location provenance.
    Marker { id: MarkerId, anchored: bool },
}

/// One plot editing session.
///
/// Owns the boundary store, the point-capture machine and the location
/// resolver, and routes UI events to them. The area is cached per store
/// revision, so reads after any polygon change see the new value.
#[derive(Debug)]
pub struct EditingSession {
    config: EngineConfig,
    store: BoundaryStore,
    capture: PointCapture,
    location: LocationResolver,
    area_cache: Cell<Option<(u64, AreaMeasure)>>,
}

impl EditingSession {
    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if `config` does not validate.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: BoundaryStore::new()
                .with_edit_tie_break(config.edit_tie_break)
                .with_area_method(config.area_method),
            capture: PointCapture::new(),
            location: LocationResolver::new()
                .with_timeout(config.geolocation_timeout)
                .with_manual_marker_provenance(config.manual_marker_sets_provenance),
            area_cache: Cell::new(None),
        })
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the boundary store.
    #[must_use]
    pub fn store(&self) -> &BoundaryStore {
        &self.store
    }

    /// Returns the point-capture machine.
    #[must_use]
    pub fn capture(&self) -> &PointCapture {
        &self.capture
    }

    /// Returns the current location provenance.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.location.provenance()
    }

    // --- Draw-tool adapter ---

    /// Forwards a draw-tool adapter event to the store.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError` if a created layer is unusable; state is kept.
    pub fn handle_draw_event(&mut self, event: &DrawEvent) -> Result<StoreUpdate> {
        Ok(self.store.apply(event)?)
    }

    // --- Map clicks and markers ---

    /// Routes a map click: a capture point while capturing, a manual marker
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidCoordinate` for an out-of-range click.
    pub fn map_click(&mut self, vertex: Vertex) -> Result<ClickOutcome> {
        if self.capture.is_capturing() {
            let count = self.capture.add_point(vertex)?;
            return Ok(ClickOutcome::CapturePoint { count });
        }
        let vertex = vertex.validated()?;
        let id = self.store.add_marker(Marker::new(vertex, MarkerKind::Manual));
        let anchored = self.location.place_manual(vertex);
        Ok(ClickOutcome::Marker { id, anchored })
    }

    /// Pins an external place-search result.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidCoordinate` for an out-of-range result.
    pub fn add_search_result(&mut self, vertex: Vertex) -> Result<MarkerId> {
        let vertex = vertex.validated()?;
        Ok(self
            .store
            .add_marker(Marker::new(vertex, MarkerKind::SearchResult)))
    }

    /// Removes a marker by ID.
    pub fn remove_marker(&mut self, id: MarkerId) -> Option<Marker> {
        self.store.remove_marker(id)
    }

    // --- Point capture ---

    /// Enters point-capture mode.
    pub fn start_capture(&mut self) {
        self.capture.start();
    }

    /// Appends a capture point.
    ///
    /// # Errors
    ///
    /// See [`PointCapture::add_point`].
    pub fn add_capture_point(&mut self, vertex: Vertex) -> Result<usize> {
        self.capture.add_point(vertex)
    }

    /// Removes the last capture point.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::NotCapturing` outside capture mode.
    pub fn undo_capture_point(&mut self) -> std::result::Result<Option<Vertex>, CaptureError> {
        self.capture.undo_last_point()
    }

    /// Turns the capture points into the authoritative polygon.
    ///
    /// # Errors
    ///
    /// See [`PointCapture::finish`].
    pub fn finish_capture(&mut self) -> Result<StoreUpdate> {
        self.capture.finish(&mut self.store)
    }

    /// Discards the capture points.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::NotCapturing` outside capture mode.
    pub fn cancel_capture(&mut self) -> std::result::Result<usize, CaptureError> {
        self.capture.cancel()
    }

    // --- Area ---

    /// Area of the authoritative polygon; zero when there is none.
    #[must_use]
    pub fn area(&self) -> AreaMeasure {
        let revision = self.store.revision();
        if let Some((cached_revision, area)) = self.area_cache.get() {
            if cached_revision == revision {
                return area;
            }
        }
        let area = RingArea::of_polygon(self.store.polygon())
            .with_method(self.config.area_method)
            .execute();
        debug!(revision, area_m2 = area.square_meters(), "recompute plot area");
        self.area_cache.set(Some((revision, area)));
        area
    }

    // --- Location ---

    /// Resolves the anchor for a selected photo, falling back to the device.
    pub async fn select_photo<P, G>(
        &mut self,
        image: &[u8],
        photo: &P,
        device: &G,
    ) -> LocationOutcome
    where
        P: PhotoGpsReader,
        G: GeolocationSource,
    {
        let outcome = self.location.resolve_photo(image, photo, device).await;
        self.pin_resolved(&outcome);
        outcome
    }

    /// Resolves the anchor from an explicit device location request.
    pub async fn request_device_location<G>(&mut self, device: &G) -> LocationOutcome
    where
        G: GeolocationSource,
    {
        let outcome = self.location.request_device_location(device).await;
        self.pin_resolved(&outcome);
        outcome
    }

    /// Starts a photo resolution driven by the caller's own event loop.
    pub fn begin_photo(&mut self) -> RequestToken {
        self.location.begin_photo()
    }

    /// Feeds a photo GPS read result.
    pub fn complete_photo(&mut self, token: RequestToken, gps: Option<Vertex>) -> LocationOutcome {
        let outcome = self.location.complete_photo(token, gps);
        self.pin_resolved(&outcome);
        outcome
    }

    /// Starts an explicit device request driven by the caller's event loop.
    pub fn begin_device_request(&mut self) -> RequestToken {
        self.location.begin_device_request()
    }

    /// Feeds a device geolocation result.
    pub fn complete_device(
        &mut self,
        token: RequestToken,
        result: std::result::Result<Vertex, GeolocationError>,
    ) -> LocationOutcome {
        let outcome = self.location.complete_device(token, result);
        self.pin_resolved(&outcome);
        outcome
    }

    fn pin_resolved(&mut self, outcome: &LocationOutcome) {
        let LocationOutcome::Resolved { provenance, .. } = outcome else {
            return;
        };
        let marker = match *provenance {
            Provenance::PhotoExif(v) => Marker::new(v, MarkerKind::PhotoLocation),
            Provenance::DeviceGeolocation(v) => Marker::new(v, MarkerKind::DeviceLocation),
            Provenance::ManualMarker(_) | Provenance::None => return,
        };
        self.store.add_marker(marker);
    }

    // --- Submission ---

    /// Builds the submission record stamped with `submitted_at`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingName` if the name is blank.
    pub fn build_record(
        &self,
        metadata: &PlotMetadata,
        submitted_at: DateTime<Utc>,
    ) -> Result<PlotRecord> {
        Ok(BuildPlotRecord::new(metadata)
            .with_method(self.config.area_method)
            .execute(&self.store, self.location.provenance(), submitted_at)?)
    }

    /// Builds the submission record stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingName` if the name is blank.
    pub fn build_record_now(&self, metadata: &PlotMetadata) -> Result<PlotRecord> {
        self.build_record(metadata, Utc::now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::boundary::PolygonChange;
    use crate::error::{BoundaryError, ValidationError};
    use crate::geometry::{DrawLayer, ExternalGeometry, LayerId};
    use crate::location::{ExifGpsReader, GpsTags, ProvenanceSource};
    use std::time::Duration;

    fn session() -> EditingSession {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
            )
            .with_test_writer()
            .try_init();
        EditingSession::new(EngineConfig::default()).unwrap()
    }

    fn square(lng: f64, lat: f64, size: f64) -> DrawLayer {
        DrawLayer::new(
            LayerId(1),
            ExternalGeometry::Polygon {
                rings: vec![vec![
                    [lng, lat],
                    [lng + size, lat],
                    [lng + size, lat + size],
                    [lng, lat + size],
                ]],
            },
        )
    }

    struct NoGps;

    impl PhotoGpsReader for NoGps {
        async fn read_gps(&self, _image: &[u8]) -> Option<Vertex> {
            None
        }
    }

    struct Device(std::result::Result<Vertex, GeolocationError>);

    impl GeolocationSource for Device {
        async fn current_position(
            &self,
            _timeout: Duration,
        ) -> std::result::Result<Vertex, GeolocationError> {
            self.0
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig::default().with_geolocation_timeout(Duration::ZERO);
        assert!(matches!(
            EditingSession::new(config),
            Err(BoundaryError::Config(_))
        ));
    }

    #[test]
    fn clicks_route_by_capture_state() {
        let mut session = session();
        let outcome = session.map_click(Vertex::new(18.5, 73.8)).unwrap();
        assert!(matches!(outcome, ClickOutcome::Marker { anchored: false, .. }));

        session.start_capture();
        let outcome = session.map_click(Vertex::new(18.5, 73.8)).unwrap();
        assert_eq!(outcome, ClickOutcome::CapturePoint { count: 1 });
        assert_eq!(session.store().marker_count(), 1);
    }

    #[test]
    fn manual_click_anchors_when_enabled() {
        let config = EngineConfig::default().with_manual_marker_provenance(true);
        let mut session = EditingSession::new(config).unwrap();
        let outcome = session.map_click(Vertex::new(18.5, 73.8)).unwrap();
        assert!(matches!(outcome, ClickOutcome::Marker { anchored: true, .. }));
        assert_eq!(session.provenance().source(), ProvenanceSource::ManualMarker);
    }

    #[test]
    fn area_follows_latest_polygon() {
        let mut session = session();
        assert_eq!(session.area(), AreaMeasure::zero());

        session
            .handle_draw_event(&DrawEvent::Created(square(73.0, 18.0, 0.001)))
            .unwrap();
        let small = session.area().square_meters();
        assert!(small > 0.0);
        assert_eq!(session.area().square_meters(), small);

        session
            .handle_draw_event(&DrawEvent::Edited(vec![square(73.0, 18.0, 0.002)]))
            .unwrap();
        let large = session.area().square_meters();
        assert!((large / small - 4.0).abs() < 0.01);

        session.handle_draw_event(&DrawEvent::Deleted(vec![])).unwrap();
        assert_eq!(session.area(), AreaMeasure::zero());
    }

    #[test]
    fn capture_round_trip_updates_area_immediately() {
        let mut session = session();
        session.start_capture();
        for v in [
            Vertex::new(18.520, 73.850),
            Vertex::new(18.520, 73.851),
            Vertex::new(18.521, 73.851),
        ] {
            session.map_click(v).unwrap();
        }
        let update = session.finish_capture().unwrap();
        assert_eq!(update.polygon, PolygonChange::Replaced);
        assert!(session.area().square_meters() > 0.0);
        assert!(!session.capture().is_capturing());
    }

    #[test]
    fn last_writer_wins_between_producers() {
        let mut session = session();
        session.start_capture();
        for v in [
            Vertex::new(18.520, 73.850),
            Vertex::new(18.520, 73.851),
            Vertex::new(18.521, 73.851),
        ] {
            session.add_capture_point(v).unwrap();
        }
        session.finish_capture().unwrap();
        session
            .handle_draw_event(&DrawEvent::Created(square(74.0, 19.0, 0.001)))
            .unwrap();
        assert_eq!(
            session.store().polygon().unwrap().vertices()[0],
            Vertex::new(19.0, 74.0)
        );
    }

    #[tokio::test]
    async fn photo_fallback_pins_device_marker() {
        let mut session = session();
        let device_point = Vertex::new(18.6, 73.9);
        let outcome = session
            .select_photo(b"jpeg", &NoGps, &Device(Ok(device_point)))
            .await;
        assert!(matches!(outcome, LocationOutcome::Resolved { fallback: true, .. }));
        assert_eq!(session.provenance(), Provenance::DeviceGeolocation(device_point));
        let (_, marker) = session.store().markers().next().unwrap();
        assert_eq!(marker.kind, MarkerKind::DeviceLocation);
        assert_eq!(marker.position, device_point);
    }

    #[tokio::test]
    async fn photo_exif_pins_photo_marker() {
        let mut session = session();
        let photo = ExifGpsReader::new(|_: &[u8]| {
            Some(GpsTags {
                latitude: [(18, 1), (31, 1), (1200, 100)],
                latitude_ref: "N".to_owned(),
                longitude: [(73, 1), (51, 1), (0, 1)],
                longitude_ref: "E".to_owned(),
            })
        });
        let outcome = session
            .select_photo(b"jpeg", &photo, &Device(Err(GeolocationError::Unsupported)))
            .await;
        assert!(matches!(outcome, LocationOutcome::Resolved { fallback: false, .. }));
        assert_eq!(session.provenance().source(), ProvenanceSource::PhotoExif);
        let (_, marker) = session.store().markers().next().unwrap();
        assert_eq!(marker.kind, MarkerKind::PhotoLocation);
    }

    #[tokio::test]
    async fn failed_device_request_adds_nothing() {
        let mut session = session();
        let outcome = session
            .request_device_location(&Device(Err(GeolocationError::PermissionDenied)))
            .await;
        assert!(matches!(outcome, LocationOutcome::Unavailable(_)));
        assert_eq!(session.store().marker_count(), 0);
        assert_eq!(session.provenance(), Provenance::None);
    }

    #[test]
    fn event_driven_photo_resolution() {
        let mut session = session();
        let token = session.begin_photo();
        let photo_point = Vertex::new(18.52, 73.85);
        session.complete_photo(token, Some(photo_point));
        assert_eq!(session.provenance(), Provenance::PhotoExif(photo_point));
        let (_, marker) = session.store().markers().next().unwrap();
        assert_eq!(marker.kind, MarkerKind::PhotoLocation);
    }

    #[test]
    fn build_record_uses_session_state() {
        let mut session = session();
        session
            .handle_draw_event(&DrawEvent::Created(square(73.0, 18.0, 0.001)))
            .unwrap();
        let token = session.begin_device_request();
        session.complete_device(token, Ok(Vertex::new(18.0005, 73.0005)));

        let record = session
            .build_record_now(&PlotMetadata::new("East plot"))
            .unwrap();
        assert_eq!(record.boundary.len(), 4);
        assert!((record.area_square_meters - session.area().square_meters()).abs() < 1e-9);
        assert_eq!(record.provenance.source(), ProvenanceSource::DeviceGeolocation);
        assert_eq!(record.markers.len(), 1);

        assert!(matches!(
            session.build_record_now(&PlotMetadata::default()),
            Err(BoundaryError::Validation(ValidationError::MissingName))
        ));
    }
}
