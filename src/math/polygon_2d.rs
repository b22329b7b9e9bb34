use super::Point2;

/// Computes the signed area of a polygon in the local plane (shoelace formula).
///
/// The polygon is closed implicitly. Positive for counter-clockwise, negative
/// for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if any two non-adjacent edges of the closed polygon cross.
///
/// Shared endpoints of consecutive edges are not counted as crossings.
#[must_use]
pub fn has_self_intersection(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a0 = points[i];
        let a1 = points[(i + 1) % n];
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            let b0 = points[j];
            let b1 = points[(j + 1) % n];
            if super::intersect_2d::segment_segment_intersect_2d(&a0, &a1, &b0, &b1).is_some() {
                return true;
            }
        }
    }
    false
}
