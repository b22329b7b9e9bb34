use thiserror::Error;

/// Top-level error type for the plot boundary engine.
///
/// Every variant is recoverable: callers keep their previous state and
/// surface the message to the user.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A geometry could not be turned into a usable ring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(&'static str),

    #[error("ring has {found} distinct vertices, at least {required} are required")]
    TooFewVertices { found: usize, required: usize },

    #[error("invalid coordinate (lat {lat}, lng {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// Errors raised by the point-capture state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("point capture is not active")]
    NotCapturing,

    #[error("capture has {count} points, at least 3 are required to finish")]
    TooShort { count: usize },
}

/// Failure reported by a device geolocation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("geolocation request timed out")]
    Timeout,

    #[error("geolocation is not supported on this device")]
    Unsupported,
}

/// No anchor location could be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("photo has no GPS data and device location failed; place the plot manually")]
    PhotoFallbackFailed(#[source] GeolocationError),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl LocationError {
    /// Returns the underlying device failure.
    #[must_use]
    pub fn geolocation_error(&self) -> GeolocationError {
        match *self {
            Self::PhotoFallbackFailed(err) | Self::Geolocation(err) => err,
        }
    }
}

/// Plot metadata failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("plot name is required")]
    MissingName,
}

/// Engine configuration is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Convenience type alias for results using [`BoundaryError`].
pub type Result<T> = std::result::Result<T, BoundaryError>;
