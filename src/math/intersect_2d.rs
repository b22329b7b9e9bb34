use super::{Point2, Vector2, METRIC_TOLERANCE};

/// Bounded segment-segment intersection in the local plane.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel and collinear segments report no intersection.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da: Vector2 = a1 - a0;
    let db: Vector2 = b1 - b0;

    let cross = da.perp(&db);
    if cross.abs() < METRIC_TOLERANCE {
        return None;
    }

    let d = b0 - a0;
    let t = d.perp(&db) / cross;
    let u = d.perp(&da) / cross;

    // Small epsilon so touching endpoints count.
    let range = -METRIC_TOLERANCE..=1.0 + METRIC_TOLERANCE;
    if range.contains(&t) && range.contains(&u) {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}
