//! Conversion of EXIF GPS tags into a [`Vertex`].
//!
//! EXIF stores each coordinate as three unsigned rationals (degrees, minutes,
//! seconds) plus a hemisphere reference (`N`/`S`, `E`/`W`).
//! [`ExifGpsReader`] turns a tag decoder into a [`PhotoGpsReader`].

use tracing::debug;

use super::PhotoGpsReader;
use crate::geometry::Vertex;

/// An unsigned EXIF rational, `numerator / denominator`.
pub type Rational = (u32, u32);

/// A coordinate in degrees, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    /// Creates a new DMS coordinate.
    #[must_use]
    pub fn new(degrees: f64, minutes: f64, seconds: f64) -> Self {
        Self {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Builds a coordinate from the three EXIF rationals.
    ///
    /// Returns `None` if any denominator is zero.
    #[must_use]
    pub fn from_rationals(parts: [Rational; 3]) -> Option<Self> {
        let [d, m, s] = parts.map(|(num, den)| {
            if den == 0 {
                None
            } else {
                Some(f64::from(num) / f64::from(den))
            }
        });
        Some(Self::new(d?, m?, s?))
    }

    /// Returns the unsigned decimal degrees.
    #[must_use]
    pub fn to_decimal(&self) -> f64 {
        self.degrees + self.minutes / 60.0 + self.seconds / 3600.0
    }
}

/// Converts EXIF GPS latitude/longitude tags into a vertex.
///
/// `lat_ref` must be `N` or `S` and `lng_ref` `E` or `W` (case-insensitive).
/// Returns `None` for unknown references or out-of-range results.
#[must_use]
pub fn gps_to_vertex(lat: Dms, lat_ref: &str, lng: Dms, lng_ref: &str) -> Option<Vertex> {
    let lat_sign = hemisphere_sign(lat_ref, 'N', 'S')?;
    let lng_sign = hemisphere_sign(lng_ref, 'E', 'W')?;
    let vertex = Vertex::new(lat_sign * lat.to_decimal(), lng_sign * lng.to_decimal());
    vertex.is_valid().then_some(vertex)
}

/// The GPS tags of one image, as decoded from its EXIF block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpsTags {
    /// `GPSLatitude`.
    pub latitude: [Rational; 3],
    /// `GPSLatitudeRef`.
    pub latitude_ref: String,
    /// `GPSLongitude`.
    pub longitude: [Rational; 3],
    /// `GPSLongitudeRef`.
    pub longitude_ref: String,
}

impl GpsTags {
    /// Converts the tags into a vertex; `None` if any tag is malformed.
    #[must_use]
    pub fn to_vertex(&self) -> Option<Vertex> {
        gps_to_vertex(
            Dms::from_rationals(self.latitude)?,
            &self.latitude_ref,
            Dms::from_rationals(self.longitude)?,
            &self.longitude_ref,
        )
    }
}

/// A [`PhotoGpsReader`] over a synchronous EXIF tag decoder.
///
/// The decoder returns `None` when the image has no GPS tags.
pub struct ExifGpsReader<D> {
    decode: D,
}

impl<D> ExifGpsReader<D>
where
    D: Fn(&[u8]) -> Option<GpsTags>,
{
    /// Creates a reader around `decode`.
    #[must_use]
    pub fn new(decode: D) -> Self {
        Self { decode }
    }
}

impl<D> PhotoGpsReader for ExifGpsReader<D>
where
    D: Fn(&[u8]) -> Option<GpsTags>,
{
    async fn read_gps(&self, image: &[u8]) -> Option<Vertex> {
        let tags = (self.decode)(image)?;
        let vertex = tags.to_vertex();
        if vertex.is_none() {
            debug!(
                latitude_ref = %tags.latitude_ref,
                longitude_ref = %tags.longitude_ref,
                "malformed EXIF GPS tags"
            );
        }
        vertex
    }
}

fn hemisphere_sign(reference: &str, positive: char, negative: char) -> Option<f64> {
    let mut chars = reference.trim().chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    if c == positive {
        Some(1.0)
    } else if c == negative {
        Some(-1.0)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dms_to_decimal() {
        let dms = Dms::new(18.0, 31.0, 12.0);
        assert_relative_eq!(dms.to_decimal(), 18.52, epsilon = 1e-12);
    }

    #[test]
    fn rationals_with_zero_denominator_are_rejected() {
        assert!(Dms::from_rationals([(18, 1), (31, 0), (12, 1)]).is_none());
    }

    #[test]
    fn rationals_convert() {
        let dms = Dms::from_rationals([(73, 1), (51, 1), (1234, 100)]).unwrap();
        assert_relative_eq!(dms.seconds, 12.34);
    }

    #[test]
    fn southern_western_hemispheres_are_negative() {
        let v = gps_to_vertex(
            Dms::new(33.0, 52.0, 0.0),
            "S",
            Dms::new(151.0, 12.0, 0.0),
            "w",
        )
        .unwrap();
        assert!(v.lat < 0.0);
        assert!(v.lng < 0.0);
    }

    #[test]
    fn unknown_reference_is_rejected() {
        assert!(gps_to_vertex(Dms::new(1.0, 0.0, 0.0), "X", Dms::new(1.0, 0.0, 0.0), "E").is_none());
        assert!(gps_to_vertex(Dms::new(1.0, 0.0, 0.0), "", Dms::new(1.0, 0.0, 0.0), "E").is_none());
    }

    fn pune_tags() -> GpsTags {
        GpsTags {
            latitude: [(18, 1), (31, 1), (1200, 100)],
            latitude_ref: "N".to_owned(),
            longitude: [(73, 1), (51, 1), (0, 1)],
            longitude_ref: "E".to_owned(),
        }
    }

    #[tokio::test]
    async fn reader_converts_decoded_tags() {
        let reader = ExifGpsReader::new(|_: &[u8]| Some(pune_tags()));
        let v = reader.read_gps(b"jpeg").await.unwrap();
        assert_relative_eq!(v.lat, 18.52, epsilon = 1e-12);
        assert_relative_eq!(v.lng, 73.85, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn reader_without_tags_yields_none() {
        let reader = ExifGpsReader::new(|_: &[u8]| None);
        assert!(reader.read_gps(b"png").await.is_none());
    }

    #[tokio::test]
    async fn reader_rejects_malformed_tags() {
        let reader = ExifGpsReader::new(|_: &[u8]| {
            Some(GpsTags {
                latitude_ref: "Q".to_owned(),
                ..pune_tags()
            })
        });
        assert!(reader.read_gps(b"jpeg").await.is_none());
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(gps_to_vertex(Dms::new(95.0, 0.0, 0.0), "N", Dms::new(1.0, 0.0, 0.0), "E").is_none());
    }
}
