use std::time::Duration;

use crate::boundary::EditTieBreak;
use crate::error::{ConfigError, Result};
use crate::location::DEFAULT_GEOLOCATION_TIMEOUT;
use crate::operations::AreaMethod;

/// Parameters for one editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Timeout handed to the device geolocation source.
    pub geolocation_timeout: Duration,
    /// Algorithm used for every area computation.
    pub area_method: AreaMethod,
    /// Winner selection when an edit event carries several valid polygons.
    pub edit_tie_break: EditTieBreak,
    /// Whether a manual marker may become the anchor when nothing else has.
    pub manual_marker_sets_provenance: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geolocation_timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            area_method: AreaMethod::Geodesic,
            edit_tie_break: EditTieBreak::FirstValid,
            manual_marker_sets_provenance: false,
        }
    }
}

impl EngineConfig {
    /// Sets the geolocation timeout.
    #[must_use]
    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    /// Sets the area method.
    #[must_use]
    pub fn with_area_method(mut self, method: AreaMethod) -> Self {
        self.area_method = method;
        self
    }

    /// Sets the edit tie-break rule.
    #[must_use]
    pub fn with_edit_tie_break(mut self, tie_break: EditTieBreak) -> Self {
        self.edit_tie_break = tie_break;
        self
    }

    /// Enables or disables manual-marker provenance.
    #[must_use]
    pub fn with_manual_marker_provenance(mut self, enabled: bool) -> Self {
        self.manual_marker_sets_provenance = enabled;
        self
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if the geolocation timeout is
    /// zero.
    pub fn validate(&self) -> Result<()> {
        if self.geolocation_timeout.is_zero() {
            return Err(ConfigError::InvalidParameter(
                "geolocation timeout must be positive".to_owned(),
            )
            .into());
        }
        Ok(())
    }
}
