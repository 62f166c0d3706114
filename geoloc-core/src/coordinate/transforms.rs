use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::datum::EllipsoidDatum;

/// ECEF coordinates (Earth-Centered, Earth-Fixed), meters
pub type EcefCoord = Vector3<f64>;

/// Geodetic coordinates (Longitude, Latitude, Altitude)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LlaCoord {
    pub lon: f64, // radians
    pub lat: f64, // radians
    pub alt: f64, // meters above the ellipsoid
}

impl LlaCoord {
    pub fn new(lon: f64, lat: f64, alt: f64) -> Self {
        Self { lon, lat, alt }
    }

    /// Build from angles given in degrees
    pub fn from_degrees(lon_deg: f64, lat_deg: f64, alt: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
            alt,
        }
    }

    /// Returns (lon, lat) in degrees and altitude in meters
    pub fn to_degrees(&self) -> (f64, f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees(), self.alt)
    }
}

/// Convert LLA to ECEF
pub fn lla_to_ecef(lla: &LlaCoord, datum: &EllipsoidDatum) -> EcefCoord {
    let a = datum.equatorial_radius();
    let e2 = datum.e2();

    let (sin_lat, cos_lat) = lla.lat.sin_cos();
    let (sin_lon, cos_lon) = lla.lon.sin_cos();

    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    let x = (n + lla.alt) * cos_lat * cos_lon;
    let y = (n + lla.alt) * cos_lat * sin_lon;
    let z = (n * (1.0 - e2) + lla.alt) * sin_lat;

    Vector3::new(x, y, z)
}

/// Convert ECEF to LLA
///
/// Closed-form approximation after Peter Dana (parametric latitude, one step).
/// Not exact, but within a centimeter for altitudes up to 1000 km.
pub fn ecef_to_lla(ecef: &EcefCoord, datum: &EllipsoidDatum) -> LlaCoord {
    let a = datum.equatorial_radius();
    let b = datum.polar_radius();
    let e2 = datum.e2();
    let ep2 = datum.e_prime2();

    let x = ecef.x;
    let y = ecef.y;
    let z = ecef.z;

    let p = (x * x + y * y).sqrt();

    // On the polar axis longitude is undefined
    if p == 0.0 {
        let sign = z.signum();
        return LlaCoord {
            lon: 0.0,
            lat: sign * FRAC_PI_2,
            alt: z - sign * b,
        };
    }

    let theta = ((z * a) / (p * b)).atan();
    let (sin_theta, cos_theta) = theta.sin_cos();

    let top = z + ep2 * b * sin_theta * sin_theta * sin_theta;
    let bottom = p - e2 * a * cos_theta * cos_theta * cos_theta;
    let lat = top.atan2(bottom);

    let sin_lat = lat.sin();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let alt = p / lat.cos() - n;

    LlaCoord {
        lon: normalize_longitude(y.atan2(x)),
        lat,
        alt,
    }
}

/// Wrap a longitude into (-PI, PI]
pub fn normalize_longitude(lon: f64) -> f64 {
    if lon > -PI && lon <= PI {
        return lon;
    }
    let wrapped = (lon + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}
