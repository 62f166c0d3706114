use nalgebra::Vector3;

use super::anchor::Anchor;

/// Intersect the infinite line through `p1` and `p2` with a sphere
///
/// Returns the line parameters `(mu1, mu2)` of the two crossing points, where
/// `p1 + mu * (p2 - p1)` lies on the sphere and `mu1 >= mu2`. A tangent line
/// gives `mu1 == mu2`. `None` when the line misses the sphere or `p1 == p2`.
pub fn sphere_line(
    p1: &Vector3<f64>,
    p2: &Vector3<f64>,
    center: &Vector3<f64>,
    radius: f64,
) -> Option<(f64, f64)> {
    let dp = p2 - p1;
    let offset = p1 - center;

    let a = dp.norm_squared();
    let b = 2.0 * dp.dot(&offset);
    let c = offset.norm_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if a == 0.0 || discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    Some(((-b + root) / (2.0 * a), (-b - root) / (2.0 * a)))
}

/// Shorter lines of sight (meters) have no usable direction
const MIN_SIGHT_DISTANCE: f64 = 1e-9;

/// Geometry quality of a fix, in [0, 1]
///
/// Largest absolute cosine between the unit vectors from `point` to the three
/// anchors. Lower means the lines of sight are closer to orthogonal. A point
/// sitting on an anchor has no line of sight to it and rates 1.0, the worst.
pub fn gdop_rate(
    point: &Vector3<f64>,
    p1: &Vector3<f64>,
    p2: &Vector3<f64>,
    p3: &Vector3<f64>,
) -> f64 {
    let sight = |anchor: &Vector3<f64>| (anchor - point).try_normalize(MIN_SIGHT_DISTANCE);
    let (Some(t1), Some(t2), Some(t3)) = (sight(p1), sight(p2), sight(p3)) else {
        return 1.0;
    };

    t1.dot(&t2).abs().max(t2.dot(&t3).abs()).max(t3.dot(&t1).abs())
}

/// Root mean square of the range residuals at `point`
pub fn rms_residual(point: &Vector3<f64>, anchors: &[Anchor]) -> f64 {
    if anchors.is_empty() {
        return 0.0;
    }
    let sum: f64 = anchors.iter().map(|a| a.residual(point).powi(2)).sum();
    (sum / anchors.len() as f64).sqrt()
}
