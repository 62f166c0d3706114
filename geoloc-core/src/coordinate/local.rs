//! Local East-North-Up tangent frame

use nalgebra::{Matrix3, Vector3};

use super::datum::EllipsoidDatum;
use super::transforms::{lla_to_ecef, EcefCoord, LlaCoord};

/// Rotation taking ECEF offsets into the ENU frame at `origin`
///
/// Rows are the East, North and Up unit vectors expressed in ECEF.
#[rustfmt::skip]
pub fn enu_rotation(origin: &LlaCoord) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = origin.lat.sin_cos();
    let (sin_lon, cos_lon) = origin.lon.sin_cos();

    Matrix3::new(
        -sin_lon, cos_lon, 0.0,
        -sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat,
        cos_lat * cos_lon, cos_lat * sin_lon, sin_lat,
    )
}

/// ECEF point to ENU coordinates relative to `origin`
pub fn ecef_to_enu(point: &EcefCoord, origin: &LlaCoord, datum: &EllipsoidDatum) -> Vector3<f64> {
    let origin_ecef = lla_to_ecef(origin, datum);
    enu_rotation(origin) * (point - origin_ecef)
}

/// ENU coordinates relative to `origin` back to an ECEF point
pub fn enu_to_ecef(local: &Vector3<f64>, origin: &LlaCoord, datum: &EllipsoidDatum) -> EcefCoord {
    let origin_ecef = lla_to_ecef(origin, datum);
    origin_ecef + enu_rotation(origin).transpose() * local
}

/// Rotate an ENU direction into ECEF (no translation)
///
/// Used to turn a sensor look direction into a ray for
/// [`crate::intersect::intersect`].
pub fn enu_direction_to_ecef(direction: &Vector3<f64>, origin: &LlaCoord) -> Vector3<f64> {
    enu_rotation(origin).transpose() * direction
}
