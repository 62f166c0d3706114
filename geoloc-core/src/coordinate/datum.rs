use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Reference ellipsoid of revolution (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDatum")]
pub struct EllipsoidDatum {
    equatorial_radius: f64,
    polar_radius: f64,
}

#[derive(Deserialize)]
struct RawDatum {
    equatorial_radius: f64,
    polar_radius: f64,
}

impl TryFrom<RawDatum> for EllipsoidDatum {
    type Error = ValidationError;

    fn try_from(raw: RawDatum) -> Result<Self, Self::Error> {
        Self::new(raw.equatorial_radius, raw.polar_radius)
    }
}

/// WGS84 ellipsoid
pub const WGS84: EllipsoidDatum = EllipsoidDatum {
    equatorial_radius: 6378137.0,
    polar_radius: 6356752.3142,
};

impl EllipsoidDatum {
    /// Create a datum, rejecting anything but an oblate ellipsoid
    pub fn new(equatorial_radius: f64, polar_radius: f64) -> Result<Self, ValidationError> {
        if !(polar_radius > 0.0 && equatorial_radius > polar_radius)
            || !equatorial_radius.is_finite()
        {
            return Err(ValidationError::InvalidDatum {
                equatorial: equatorial_radius,
                polar: polar_radius,
            });
        }

        Ok(Self {
            equatorial_radius,
            polar_radius,
        })
    }

    /// Semi-major axis
    pub fn equatorial_radius(&self) -> f64 {
        self.equatorial_radius
    }

    /// Semi-minor axis
    pub fn polar_radius(&self) -> f64 {
        self.polar_radius
    }

    /// First eccentricity squared
    pub fn e2(&self) -> f64 {
        let ratio = self.polar_radius / self.equatorial_radius;
        1.0 - ratio * ratio
    }

    /// Second eccentricity squared
    pub fn e_prime2(&self) -> f64 {
        let a2 = self.equatorial_radius * self.equatorial_radius;
        let b2 = self.polar_radius * self.polar_radius;
        (a2 - b2) / b2
    }

    pub fn flattening(&self) -> f64 {
        1.0 - self.polar_radius / self.equatorial_radius
    }
}

impl Default for EllipsoidDatum {
    fn default() -> Self {
        WGS84
    }
}
