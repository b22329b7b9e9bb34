use std::future::Future;
use std::time::Duration;

use crate::error::GeolocationError;
use crate::geometry::Vertex;

/// Reads embedded GPS coordinates from an image file.
///
/// Implementations decode asynchronously and return `None` when the image
/// carries no usable GPS metadata.
pub trait PhotoGpsReader {
    /// Returns the photo's GPS position, if any.
    fn read_gps(&self, image: &[u8]) -> impl Future<Output = Option<Vertex>>;
}

/// Queries the device for its current position.
pub trait GeolocationSource {
    /// Resolves to the current position or the reason it is unavailable.
    ///
    /// Implementations must give up after `timeout` and report
    /// `GeolocationError::Timeout`.
    fn current_position(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vertex, GeolocationError>>;
}
