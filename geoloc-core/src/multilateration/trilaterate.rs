//! Closed-form intersection of three spheres, disambiguated by a fourth

use nalgebra::Vector3;

use super::anchor::Anchor;
use super::sphere::{gdop_rate, sphere_line};
use crate::error::{Degeneracy, TrilaterationError};

/// Slack on the [0, 1] chord range and on double roots
const MU_TOLERANCE: f64 = 1e-9;

/// Sphere 4 is grown by this much (meters) while the chord misses it
const SPHERE4_GROWTH: f64 = 0.1;
const SPHERE4_GROWTH_STEPS: usize = 10;

/// Answer of a single solver pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SphereFix {
    /// Spheres 1-3 meet at two mirror points and sphere 4 cannot tell them apart
    ThreeSphere {
        candidate1: Vector3<f64>,
        candidate2: Vector3<f64>,
    },
    /// Sphere 4 picked a single point
    FourSphere { best: Vector3<f64>, gdop_rate: f64 },
}

/// Intersect four spheres given as (center, radius) anchors
///
/// Spheres 1-3 are solved in a local frame with `ex` along p1->p2, `ey` in
/// the anchor plane and `ez = ex x ey`, giving two candidates mirrored across
/// that plane. Sphere 4 is then used to pick one. To force the two-candidate
/// answer pass a copy of one of the first three spheres as sphere 4.
///
/// `epsilon` is the largest distance still treated as zero.
pub fn trilaterate(spheres: &[Anchor; 4], epsilon: f64) -> Result<SphereFix, TrilaterationError> {
    let [s1, s2, s3, s4] = spheres;
    let (p1, p2, p3, p4) = (&s1.position, &s2.position, &s3.position, &s4.position);
    let (r1, r2, r3) = (s1.range, s2.range, s3.range);

    if (p3 - p1).norm() <= epsilon || (p3 - p2).norm() <= epsilon || (p2 - p1).norm() <= epsilon {
        return Err(TrilaterationError::DegenerateGeometry(Degeneracy::Concentric));
    }

    let h = (p2 - p1).norm();
    let ex = (p2 - p1) / h;

    let t1 = p3 - p1;
    let i = ex.dot(&t1);
    let perpendicular = t1 - ex * i;
    let t = perpendicular.norm();

    let (ey, j) = if t > epsilon {
        let ey = perpendicular / t;
        (ey, ey.dot(&t1))
    } else {
        (Vector3::zeros(), 0.0)
    };

    if j.abs() <= epsilon {
        return colinear_fix(spheres, &ex, epsilon);
    }

    let ez = ex.cross(&ey);

    let x = (r1 * r1 - r2 * r2) / (2.0 * h) + h / 2.0;
    let y = (r1 * r1 - r3 * r3 + i * i) / (2.0 * j) + j / 2.0 - x * i / j;
    let z2 = r1 * r1 - x * x - y * y;
    if z2 < -epsilon {
        return Err(TrilaterationError::NoRealSolution);
    }
    let z = if z2 > 0.0 { z2.sqrt() } else { 0.0 };

    let base = p1 + ex * x + ey * y;
    let result1 = base + ez * z;
    let result2 = base - ez * z;

    // Sphere 4 repeats one of the others and carries no information
    if [p1, p2, p3].iter().any(|p| (p4 - *p).norm() <= epsilon) {
        return Ok(SphereFix::ThreeSphere {
            candidate1: result1,
            candidate2: result2,
        });
    }

    let best = pick_with_fourth(&result1, &result2, s4, epsilon);
    Ok(SphereFix::FourSphere {
        best,
        gdop_rate: gdop_rate(&best, p1, p2, p3),
    })
}

/// Centers on a line: only a point on that line at distance r1 from p1 works
fn colinear_fix(
    spheres: &[Anchor; 4],
    ex: &Vector3<f64>,
    epsilon: f64,
) -> Result<SphereFix, TrilaterationError> {
    let [s1, s2, s3, _] = spheres;

    for direction in [1.0, -1.0] {
        let candidate = s1.position + ex * (direction * s1.range);
        if s2.residual(&candidate).abs() <= epsilon && s3.residual(&candidate).abs() <= epsilon {
            return Ok(SphereFix::ThreeSphere {
                candidate1: candidate,
                candidate2: candidate,
            });
        }
    }

    Err(TrilaterationError::DegenerateGeometry(Degeneracy::Colinear2Solutions))
}

/// Walk the chord between the two candidates to where sphere 4 agrees best
fn pick_with_fourth(
    result1: &Vector3<f64>,
    result2: &Vector3<f64>,
    sphere4: &Anchor,
    epsilon: f64,
) -> Vector3<f64> {
    let p4 = &sphere4.position;

    // near end of the chord is the candidate closest to the center of sphere 4
    let (near, far) = if (result1 - p4).norm() > (result2 - p4).norm() {
        (result2, result1)
    } else {
        (result1, result2)
    };

    let chord = far - near;

    // Spheres 1-3 touch at a single point
    if chord.norm() <= epsilon {
        return *near;
    }

    let crossing = (0..SPHERE4_GROWTH_STEPS)
        .find_map(|step| sphere_line(near, far, p4, sphere4.range + step as f64 * SPHERE4_GROWTH));

    match crossing {
        Some((mu1, mu2)) => near + chord * chord_parameter(mu1, mu2),
        None => *near,
    }
}

fn in_unit_range(mu: f64) -> bool {
    (-MU_TOLERANCE..=1.0 + MU_TOLERANCE).contains(&mu)
}

/// Position along the chord (0 = near candidate, 1 = far candidate) given
/// where sphere 4 crosses the chord line, with `mu1 >= mu2`
///
/// Each case splits the disagreement between the three-sphere answer and
/// sphere 4 evenly.
pub(crate) fn chord_parameter(mu1: f64, mu2: f64) -> f64 {
    match (in_unit_range(mu1), in_unit_range(mu2)) {
        // tangent to sphere 4 inside the chord
        (true, true) if (mu1 - mu2).abs() <= MU_TOLERANCE => {
            let mu = mu1;
            if mu <= 0.25 {
                mu - 0.5 * mu
            } else if mu <= 0.5 {
                mu - 0.5 * (0.5 - mu)
            } else if mu <= 0.75 {
                mu - 0.5 * (mu - 0.5)
            } else {
                mu - 0.5 * (1.0 - mu)
            }
        }
        // two crossings inside the chord
        (true, true) => 0.5 * (mu1 + mu2),
        // one crossing inside the chord
        (true, false) | (false, true) => {
            let mu = if in_unit_range(mu1) { mu1 } else { mu2 };
            if mu <= 0.5 {
                mu - 0.5 * mu
            } else {
                mu - 0.5 * (1.0 - mu)
            }
        }
        // whole chord outside sphere 4, before the near end
        (false, false) if mu1 < 0.0 => 0.5 * mu1,
        // whole chord outside sphere 4, past the far end
        (false, false) if mu2 > 1.0 => 1.0 + 0.5 * (mu2 - 1.0),
        // whole chord inside sphere 4
        (false, false) => 0.5 * (1.0 + mu1),
    }
}
