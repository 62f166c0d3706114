use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::coordinate::EllipsoidDatum;
use crate::error::IntersectionError;

/// Outcome of a ray/ellipsoid intersection
///
/// On a miss `point` is still set: it lies along the ray at roughly the
/// distance of the ellipsoid center, which callers use as a max-range cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionResult {
    pub point: Vector3<f64>,
    pub hit: bool,
}

impl IntersectionResult {
    /// Turn a miss into an error carrying the sentinel point
    pub fn into_hit(self) -> Result<Vector3<f64>, IntersectionError> {
        if self.hit {
            Ok(self.point)
        } else {
            Err(IntersectionError::NoIntersection {
                sentinel: self.point,
            })
        }
    }
}

/// Ray intersector for one ellipsoid, optionally inflated by a height offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidIntersector {
    radii: Vector3<f64>,
}

impl EllipsoidIntersector {
    pub fn new(datum: &EllipsoidDatum, height_offset: f64) -> Self {
        let equatorial = datum.equatorial_radius() + height_offset;
        let polar = datum.polar_radius() + height_offset;
        Self {
            radii: Vector3::new(equatorial, equatorial, polar),
        }
    }

    /// Per-axis radii including the height offset
    pub fn radii(&self) -> Vector3<f64> {
        self.radii
    }

    /// Nearest forward intersection of the ray with the ellipsoid
    ///
    /// `direction` is expected to be a unit vector and is not re-normalized,
    /// so the sentinel distance on a miss is in units of its length.
    pub fn intersect(&self, origin: &Vector3<f64>, direction: &Vector3<f64>) -> IntersectionResult {
        // Scaling by the radii turns the ellipsoid into the unit sphere
        let o = origin.component_div(&self.radii);
        let d = direction.component_div(&self.radii);

        let a = d.norm_squared();
        let b = o.dot(&d);
        let c = o.norm_squared() - 1.0;

        let miss = IntersectionResult {
            point: origin + direction * (c / a).sqrt(),
            hit: false,
        };

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return miss;
        }

        if c == 0.0 {
            return IntersectionResult {
                point: *origin,
                hit: true,
            };
        }

        let t = if c < 0.0 {
            // inside: only the far root is ahead of the origin
            (-b + discriminant.sqrt()) / a
        } else if b < 0.0 {
            (-b - discriminant.sqrt()) / a
        } else {
            // outside and heading away, both roots are behind the origin
            return miss;
        };

        IntersectionResult {
            point: origin + direction * t,
            hit: true,
        }
    }
}

/// Intersect a ray with `datum` grown by `height_offset` meters on every axis
pub fn intersect(
    origin: &Vector3<f64>,
    direction: &Vector3<f64>,
    datum: &EllipsoidDatum,
    height_offset: f64,
) -> IntersectionResult {
    EllipsoidIntersector::new(datum, height_offset).intersect(origin, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::{ecef_to_lla, enu_direction_to_ecef, lla_to_ecef, LlaCoord, WGS84};

    #[test]
    fn test_ray_from_center() {
        let result = intersect(&Vector3::zeros(), &Vector3::x(), &WGS84, 0.0);
        assert!(result.hit);
        assert!((result.point - Vector3::new(WGS84.equatorial_radius(), 0.0, 0.0)).norm() < 1e-6);

        let result = intersect(&Vector3::zeros(), &Vector3::z(), &WGS84, 0.0);
        assert!(result.hit);
        assert!((result.point.z - WGS84.polar_radius()).abs() < 1e-6);
    }

    #[test]
    fn test_nadir_from_orbit() {
        let origin = Vector3::new(7_000_000.0, 0.0, 0.0);
        let result = intersect(&origin, &-Vector3::x(), &WGS84, 0.0);
        assert!(result.hit);
        assert!((result.point.x - WGS84.equatorial_radius()).abs() < 1e-6);
    }

    #[test]
    fn test_height_offset() {
        let origin = Vector3::new(7_000_000.0, 0.0, 0.0);
        let result = intersect(&origin, &-Vector3::x(), &WGS84, 250.0);
        assert!(result.hit);
        assert!((result.point.x - (WGS84.equatorial_radius() + 250.0)).abs() < 1e-6);
    }

    #[test]
    fn test_miss_returns_sentinel() {
        let origin = Vector3::new(7_000_000.0, 0.0, 0.0);
        let result = intersect(&origin, &Vector3::y(), &WGS84, 0.0);
        assert!(!result.hit);
        // Sentinel is pushed along the ray, never behind it
        assert!(result.point.y > 0.0);
        assert_eq!(result.point.x, origin.x);

        let err = result.into_hit().unwrap_err();
        assert_eq!(err, IntersectionError::NoIntersection { sentinel: result.point });
    }

    #[test]
    fn test_pointing_away_is_a_miss() {
        let origin = Vector3::new(7_000_000.0, 0.0, 0.0);
        let result = intersect(&origin, &Vector3::x(), &WGS84, 0.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_origin_on_surface() {
        let origin = Vector3::new(WGS84.equatorial_radius(), 0.0, 0.0);
        let result = intersect(&origin, &Vector3::y(), &WGS84, 0.0);
        assert!(result.hit);
        assert_eq!(result.point, origin);
    }

    #[test]
    fn test_oblique_ray_hits_nearest_side() {
        let origin = Vector3::new(10_000_000.0, 1_000_000.0, 2_000_000.0);
        let direction = (-origin).normalize();
        let result = intersect(&origin, &direction, &WGS84, 0.0);
        assert!(result.hit);

        let lla = ecef_to_lla(&result.point, &WGS84);
        assert!(lla.alt.abs() < 1e-3);
        // Near side of the ellipsoid
        assert!(result.point.dot(&origin) > 0.0);
        assert!((result.point - origin).norm() < origin.norm());
    }

    #[test]
    fn test_look_down_from_aircraft() {
        let camera = LlaCoord::from_degrees(-98.5, 39.8, 3000.0);
        let origin = lla_to_ecef(&camera, &WGS84);
        let down = enu_direction_to_ecef(&Vector3::new(0.0, 0.0, -1.0), &camera);

        let ground = intersect(&origin, &down, &WGS84, 0.0).into_hit().unwrap();
        let lla = ecef_to_lla(&ground, &WGS84);

        assert!(((ground - origin).norm() - 3000.0).abs() < 1e-3);
        assert!((lla.lat - camera.lat).abs() < 1e-6);
        assert!((lla.lon - camera.lon).abs() < 1e-9);
        assert!(lla.alt.abs() < 1e-2);
    }

    #[test]
    fn test_intersector_reuse() {
        let intersector = EllipsoidIntersector::new(&WGS84, 100.0);
        assert_eq!(intersector.radii().z, WGS84.polar_radius() + 100.0);

        for axis in [Vector3::x(), -Vector3::y(), Vector3::z()] {
            let result = intersector.intersect(&Vector3::zeros(), &axis);
            assert!(result.hit);
            assert!(result.point.dot(&axis) > 0.0);
        }
    }
}
