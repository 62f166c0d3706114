//! Geodetic and positioning math: frame transforms, ray/ellipsoid
//! intersection and range-based multilateration.

pub mod coordinate;
pub mod error;
pub mod intersect;
pub mod multilateration;

pub use coordinate::{ecef_to_lla, lla_to_ecef, EcefCoord, EllipsoidDatum, LlaCoord, WGS84};
pub use error::{GeolocError, Result};
pub use intersect::{intersect, EllipsoidIntersector, IntersectionResult};
pub use multilateration::{get_location, locate, AnchorSet, Multilaterator, TrilaterationResult};
