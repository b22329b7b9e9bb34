//! Plot boundary capture and area engine.
//!
//! Keeps one authoritative polygon per editing session, fed by a draw-tool
//! adapter or by click-by-click point capture, measures it geodesically, and
//! resolves the plot's anchor location from photo GPS, device geolocation or
//! a manual marker.

pub mod boundary;
pub mod capture;
pub mod config;
pub mod error;
pub mod geometry;
pub mod location;
pub mod math;
pub mod operations;
pub mod record;
pub mod session;
pub mod telemetry;

pub use boundary::{BoundaryStore, EditTieBreak, Marker, MarkerId, MarkerKind, StoreUpdate};
pub use capture::{CaptureState, PointCapture};
pub use config::EngineConfig;
pub use error::{BoundaryError, Result};
pub use geometry::{DrawEvent, DrawLayer, ExternalGeometry, LayerId, Ring, Vertex};
pub use location::{LocationOutcome, LocationResolver, Provenance, ProvenanceSource};
pub use operations::{AreaMeasure, AreaMethod};
pub use record::{PlotMetadata, PlotRecord};
pub use session::{ClickOutcome, EditingSession};
pub use telemetry::init_default_tracing;
