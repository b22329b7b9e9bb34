use chrono::{DateTime, Utc};
use tracing::debug;

use crate::boundary::BoundaryStore;
use crate::error::ValidationError;
use crate::location::Provenance;
use crate::record::{PlotMetadata, PlotRecord};

use super::{AreaMethod, RingArea};

/// Assembles a [`PlotRecord`] from the session state.
///
/// The area is computed from the store's current polygon at build time. An
/// empty boundary is accepted and measures zero.
pub struct BuildPlotRecord<'a> {
    metadata: &'a PlotMetadata,
    method: AreaMethod,
}

impl<'a> BuildPlotRecord<'a> {
    /// Creates a new `BuildPlotRecord` operation.
    #[must_use]
    pub fn new(metadata: &'a PlotMetadata) -> Self {
        Self {
            metadata,
            method: AreaMethod::default(),
        }
    }

    /// Selects the area method.
    #[must_use]
    pub fn with_method(mut self, method: AreaMethod) -> Self {
        self.method = method;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingName` if the name is blank.
    pub fn execute(
        &self,
        store: &BoundaryStore,
        provenance: Provenance,
        submitted_at: DateTime<Utc>,
    ) -> Result<PlotRecord, ValidationError> {
        let name = self.metadata.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let polygon = store.polygon();
        let area = RingArea::of_polygon(polygon).with_method(self.method).execute();
        let boundary = polygon.map(|ring| ring.vertices().to_vec()).unwrap_or_default();
        let markers = store.markers().map(|(_, marker)| *marker).collect();

        debug!(
            plot = name,
            vertices = boundary.len(),
            area_m2 = area.square_meters(),
            "build plot record"
        );
        Ok(PlotRecord {
            name: name.to_owned(),
            description: self.metadata.description.clone(),
            declared_area: self.metadata.declared_area.clone(),
            area_square_meters: area.square_meters(),
            boundary,
            markers,
            provenance,
            submitted_at,
        })
    }
}
