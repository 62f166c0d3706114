//! Distances and bearings on a spherical Earth
//!
//! All functions take geodetic latitude/longitude in radians and use the
//! mean Earth radius, so results are approximations of the true geodesic.

use serde::{Deserialize, Serialize};

/// Mean Earth radius (meters)
pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0;

/// Latitude/longitude pair in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Great-circle distance formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceFormula {
    /// Stable at all distances
    #[default]
    Haversine,
    /// Simpler, loses precision for short distances
    LawOfCosines,
    /// Fast, only valid for short distances away from the poles
    Equirectangular,
}

impl DistanceFormula {
    pub fn distance(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        match self {
            Self::Haversine => haversine_distance(lat1, lon1, lat2, lon2),
            Self::LawOfCosines => law_of_cosines_distance(lat1, lon1, lat2, lon2),
            Self::Equirectangular => equirectangular_distance(lat1, lon1, lat2, lon2),
        }
    }
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let half_dlat = ((lat2 - lat1) / 2.0).sin();
    let half_dlon = ((lon2 - lon1) / 2.0).sin();

    let a = half_dlat * half_dlat + lat1.cos() * lat2.cos() * half_dlon * half_dlon;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    c * MEAN_EARTH_RADIUS
}

pub fn law_of_cosines_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let cos_c = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
    cos_c.acos() * MEAN_EARTH_RADIUS
}

pub fn equirectangular_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let x = (lon2 - lon1) * ((lat1 + lat2) / 2.0).cos();
    let y = lat2 - lat1;
    (x * x + y * y).sqrt() * MEAN_EARTH_RADIUS
}

/// Initial bearing of the great circle from point 1 to point 2, in radians
/// clockwise from north, in [-PI, PI]
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlon = lon2 - lon1;
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x)
}

/// Point at `fraction` of the way along the great circle from point 1 to point 2
///
/// `dist` is the great-circle distance between the two points as returned by
/// [`haversine_distance`] or [`law_of_cosines_distance`]. The interpolation
/// is undefined for coincident or antipodal points (NaN is returned).
pub fn intermediate_point(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    dist: f64,
    fraction: f64,
) -> LatLon {
    let delta = dist / MEAN_EARTH_RADIUS;
    let sin_delta = delta.sin();

    let a = ((1.0 - fraction) * delta).sin() / sin_delta;
    let b = (fraction * delta).sin() / sin_delta;

    let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
    let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    LatLon {
        lat: z.atan2((x * x + y * y).sqrt()),
        lon: y.atan2(x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_quarter_circumference() {
        let d = haversine_distance(0.0, 0.0, 0.0, FRAC_PI_2);
        assert!((d - FRAC_PI_2 * MEAN_EARTH_RADIUS).abs() < 1.0);

        let d = law_of_cosines_distance(0.0, 0.0, 0.0, FRAC_PI_2);
        assert!((d - FRAC_PI_2 * MEAN_EARTH_RADIUS).abs() < 1.0);

        // Exact along the equator
        let d = equirectangular_distance(0.0, 0.0, 0.0, FRAC_PI_2);
        assert!((d - FRAC_PI_2 * MEAN_EARTH_RADIUS).abs() < 1.0);
    }

    #[test]
    fn test_formulas_agree_at_short_range() {
        // Paris to a point ~1.4 km away
        let (lat1, lon1) = (48.8566f64.to_radians(), 2.3522f64.to_radians());
        let (lat2, lon2) = (48.8666f64.to_radians(), 2.3622f64.to_radians());

        let h = DistanceFormula::Haversine.distance(lat1, lon1, lat2, lon2);
        let c = DistanceFormula::LawOfCosines.distance(lat1, lon1, lat2, lon2);
        let e = DistanceFormula::Equirectangular.distance(lat1, lon1, lat2, lon2);

        assert!((h - c).abs() < 0.01);
        assert!((h - e).abs() < 0.01);
    }

    #[test]
    fn test_default_formula() {
        assert_eq!(DistanceFormula::default(), DistanceFormula::Haversine);
    }

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_distance(0.7, 0.3, 0.7, 0.3), 0.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        // Due east along the equator
        assert!((bearing(0.0, 0.0, 0.0, 0.1) - FRAC_PI_2).abs() < 1e-12);
        // Due north
        assert!(bearing(0.0, 0.0, 0.1, 0.0).abs() < 1e-12);
        // Due south
        assert!((bearing(0.1, 0.0, 0.0, 0.0).abs() - PI).abs() < 1e-12);
        // Due west
        assert!((bearing(0.0, 0.0, 0.0, -0.1) + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_intermediate_point_on_equator() {
        let dist = haversine_distance(0.0, 0.0, 0.0, FRAC_PI_2);
        let mid = intermediate_point(0.0, 0.0, 0.0, FRAC_PI_2, dist, 0.5);
        assert!(mid.lat.abs() < 1e-12);
        assert!((mid.lon - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_intermediate_point_endpoints() {
        let (lat1, lon1) = (0.6, -1.2);
        let (lat2, lon2) = (-0.3, 0.4);
        let dist = haversine_distance(lat1, lon1, lat2, lon2);

        let start = intermediate_point(lat1, lon1, lat2, lon2, dist, 0.0);
        assert!((start.lat - lat1).abs() < 1e-12);
        assert!((start.lon - lon1).abs() < 1e-12);

        let end = intermediate_point(lat1, lon1, lat2, lon2, dist, 1.0);
        assert!((end.lat - lat2).abs() < 1e-12);
        assert!((end.lon - lon2).abs() < 1e-12);
    }

    #[test]
    fn test_intermediate_point_splits_distance() {
        let (lat1, lon1) = (0.9, 0.1);
        let (lat2, lon2) = (0.2, 1.3);
        let dist = haversine_distance(lat1, lon1, lat2, lon2);

        let p = intermediate_point(lat1, lon1, lat2, lon2, dist, 0.25);
        let d1 = haversine_distance(lat1, lon1, p.lat, p.lon);
        let d2 = haversine_distance(p.lat, p.lon, lat2, lon2);

        assert!((d1 - 0.25 * dist).abs() < 1e-3);
        assert!((d2 - 0.75 * dist).abs() < 1e-3);
    }
}
