pub mod intersect_2d;
pub mod polygon_2d;
pub mod projection;

/// 2D point in a local metric plane (meters east, meters north).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector in a local metric plane.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Tolerance, in degrees, under which two vertices are considered identical.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for comparisons in projected meter space.
pub const METRIC_TOLERANCE: f64 = 1e-9;

/// Mean earth radius (IUGG), in meters.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;
