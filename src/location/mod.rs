pub mod exif;
pub mod provenance;
pub mod sources;

pub use exif::{ExifGpsReader, GpsTags};
pub use provenance::{Provenance, ProvenanceSource};
pub use sources::{GeolocationSource, PhotoGpsReader};

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{GeolocationError, LocationError};
use crate::geometry::Vertex;

/// Default device geolocation timeout.
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifies one in-flight location request.
///
/// Every new request supersedes all earlier ones; results carrying an older
/// token are reported as [`LocationOutcome::Stale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    /// Waiting for the photo GPS read.
    Photo,
    /// Photo had no GPS; waiting for the device fallback.
    PhotoFallback,
    /// Explicit user request for the device location.
    Device,
}

/// Result of feeding a location event into the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    /// A new anchor was set.
    Resolved {
        provenance: Provenance,
        /// `true` when device geolocation stood in for missing photo GPS.
        fallback: bool,
    },
    /// The photo has no GPS; query the device and pass the result to
    /// [`LocationResolver::complete_device`] with this token.
    NeedsDeviceFallback { token: RequestToken },
    /// No location could be derived. Provenance is unchanged and the user
    /// must place the plot manually.
    Unavailable(LocationError),
    /// The result belongs to a superseded request and was ignored.
    Stale,
}

/// Resolves the plot's anchor location from competing evidence.
///
/// Photo GPS wins for a photo selection; device geolocation is its fallback.
/// An explicit device request resolves independently. Asynchronous results
/// are delivered back through `complete_*` methods and gated by
/// [`RequestToken`]s so a late answer can never overwrite a newer one.
#[derive(Debug)]
pub struct LocationResolver {
    provenance: Provenance,
    pending: Option<(RequestToken, RequestKind)>,
    next_token: u64,
    timeout: Duration,
    manual_marker_sets_provenance: bool,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self {
            provenance: Provenance::None,
            pending: None,
            next_token: 0,
            timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            manual_marker_sets_provenance: false,
        }
    }
}

impl LocationResolver {
    /// Creates a resolver with no provenance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout passed to the geolocation source.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lets a manual marker become the anchor while nothing else is resolved.
    #[must_use]
    pub fn with_manual_marker_provenance(mut self, enabled: bool) -> Self {
        self.manual_marker_sets_provenance = enabled;
        self
    }

    /// Returns the current provenance.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns the geolocation timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` while a request is awaiting its result.
    #[must_use]
    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Clears the provenance and forgets any pending request.
    pub fn reset(&mut self) {
        self.provenance = Provenance::None;
        self.pending = None;
    }

    // --- Photo selection ---

    /// Starts resolution for a newly selected photo.
    pub fn begin_photo(&mut self) -> RequestToken {
        self.begin(RequestKind::Photo)
    }

    /// Feeds the photo GPS read result.
    pub fn complete_photo(&mut self, token: RequestToken, gps: Option<Vertex>) -> LocationOutcome {
        if !self.is_pending(token, &[RequestKind::Photo]) {
            return stale(token);
        }
        match gps {
            Some(vertex) if vertex.is_valid() => {
                self.pending = None;
                self.resolve(Provenance::PhotoExif(vertex), false)
            }
            gps => {
                if let Some(vertex) = gps {
                    warn!(lat = vertex.lat, lng = vertex.lng, "ignoring out-of-range photo GPS");
                }
                debug!("photo has no GPS data, falling back to device location");
                self.pending = Some((token, RequestKind::PhotoFallback));
                LocationOutcome::NeedsDeviceFallback { token }
            }
        }
    }

    // --- Device geolocation ---

    /// Starts an explicit device location request.
    pub fn begin_device_request(&mut self) -> RequestToken {
        self.begin(RequestKind::Device)
    }

    /// Feeds a device geolocation result, either for an explicit request or
    /// for a photo fallback.
    pub fn complete_device(
        &mut self,
        token: RequestToken,
        result: Result<Vertex, GeolocationError>,
    ) -> LocationOutcome {
        let Some((_, kind)) = self
            .pending
            .filter(|(pending, kind)| *pending == token && *kind != RequestKind::Photo)
        else {
            return stale(token);
        };
        self.pending = None;

        let fallback = kind == RequestKind::PhotoFallback;
        let result = result.and_then(|vertex| {
            if vertex.is_valid() {
                Ok(vertex)
            } else {
                Err(GeolocationError::PositionUnavailable)
            }
        });
        match result {
            Ok(vertex) => self.resolve(Provenance::DeviceGeolocation(vertex), fallback),
            Err(err) => {
                warn!(error = %err, fallback, "device location failed");
                let err = if fallback {
                    LocationError::PhotoFallbackFailed(err)
                } else {
                    LocationError::Geolocation(err)
                };
                LocationOutcome::Unavailable(err)
            }
        }
    }

    // --- Manual placement ---

    /// Records a manually placed marker.
    ///
    /// Returns `true` if the marker became the anchor, which only happens when
    /// enabled and no provenance is set yet.
    pub fn place_manual(&mut self, vertex: Vertex) -> bool {
        if !self.manual_marker_sets_provenance || self.provenance.is_resolved() || !vertex.is_valid()
        {
            return false;
        }
        debug!(lat = vertex.lat, lng = vertex.lng, "manual marker sets provenance");
        self.provenance = Provenance::ManualMarker(vertex);
        true
    }

    // --- Async drivers ---

    /// Runs the full photo chain: GPS read, then device fallback.
    pub async fn resolve_photo<P, G>(&mut self, image: &[u8], photo: &P, device: &G) -> LocationOutcome
    where
        P: PhotoGpsReader,
        G: GeolocationSource,
    {
        let token = self.begin_photo();
        let gps = photo.read_gps(image).await;
        match self.complete_photo(token, gps) {
            LocationOutcome::NeedsDeviceFallback { token } => {
                let result = device.current_position(self.timeout).await;
                self.complete_device(token, result)
            }
            outcome => outcome,
        }
    }

    /// Runs an explicit device location request.
    pub async fn request_device_location<G>(&mut self, device: &G) -> LocationOutcome
    where
        G: GeolocationSource,
    {
        let token = self.begin_device_request();
        let result = device.current_position(self.timeout).await;
        self.complete_device(token, result)
    }

    fn begin(&mut self, kind: RequestKind) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        if let Some((superseded, _)) = self.pending.replace((token, kind)) {
            debug!(superseded = superseded.0, "location request superseded");
        }
        token
    }

    fn is_pending(&self, token: RequestToken, kinds: &[RequestKind]) -> bool {
        matches!(self.pending, Some((pending, kind)) if pending == token && kinds.contains(&kind))
    }

    fn resolve(&mut self, provenance: Provenance, fallback: bool) -> LocationOutcome {
        debug!(source = ?provenance.source(), fallback, "location resolved");
        self.provenance = provenance;
        LocationOutcome::Resolved {
            provenance,
            fallback,
        }
    }
}

fn stale(token: RequestToken) -> LocationOutcome {
    debug!(token = token.0, "ignoring stale location result");
    LocationOutcome::Stale
}
