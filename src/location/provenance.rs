use crate::geometry::Vertex;

/// Which evidence produced the plot's anchor location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvenanceSource {
    PhotoExif,
    DeviceGeolocation,
    ManualMarker,
    None,
}

/// The current anchor location and its origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Provenance {
    /// Read from a photo's embedded GPS metadata.
    PhotoExif(Vertex),
    /// Reported by the device, either on request or as a photo fallback.
    DeviceGeolocation(Vertex),
    /// Taken from a manually placed marker.
    ManualMarker(Vertex),
    /// Nothing resolved yet.
    #[default]
    None,
}

impl Provenance {
    /// Returns the source tag.
    #[must_use]
    pub fn source(&self) -> ProvenanceSource {
        match self {
            Self::PhotoExif(_) => ProvenanceSource::PhotoExif,
            Self::DeviceGeolocation(_) => ProvenanceSource::DeviceGeolocation,
            Self::ManualMarker(_) => ProvenanceSource::ManualMarker,
            Self::None => ProvenanceSource::None,
        }
    }

    /// Returns the anchor location, if resolved.
    #[must_use]
    pub fn anchor(&self) -> Option<Vertex> {
        match *self {
            Self::PhotoExif(v) | Self::DeviceGeolocation(v) | Self::ManualMarker(v) => Some(v),
            Self::None => None,
        }
    }

    /// Returns `true` once any source has resolved an anchor.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_has_no_anchor() {
        assert_eq!(Provenance::None.anchor(), None);
        assert_eq!(Provenance::default().source(), ProvenanceSource::None);
        assert!(!Provenance::None.is_resolved());
    }

    #[test]
    fn resolved_variants_expose_anchor() {
        let v = Vertex::new(18.5, 73.8);
        for (p, source) in [
            (Provenance::PhotoExif(v), ProvenanceSource::PhotoExif),
            (Provenance::DeviceGeolocation(v), ProvenanceSource::DeviceGeolocation),
            (Provenance::ManualMarker(v), ProvenanceSource::ManualMarker),
        ] {
            assert_eq!(p.anchor(), Some(v));
            assert_eq!(p.source(), source);
            assert!(p.is_resolved());
        }
    }
}
