mod build_record;
mod extract_ring;
mod ring_area;
mod to_external;

pub use build_record::BuildPlotRecord;
pub use extract_ring::{extract_ring, ExtractRing};
pub use ring_area::{
    acres_from_square_meters, hectares_from_square_meters, AreaMeasure, AreaMethod, RingArea,
    SQUARE_METERS_PER_ACRE, SQUARE_METERS_PER_HECTARE,
};
pub use to_external::ToExternal;
