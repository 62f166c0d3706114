//! Earth-fixed / inertial frame rotation

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use super::transforms::EcefCoord;

/// ECI coordinates (Earth-Centered Inertial), meters
pub type EciCoord = Vector3<f64>;

/// Earth rotation rate (rad/s)
pub const EARTH_OMEGA: f64 = 7.2921158553e-5;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Days from the J2000 epoch to 1970-01-01 0h UT1
const J2000_FROM_UNIX_DAYS: f64 = -10957.5;

const DAYS_PER_CENTURY: f64 = 36525.0;

/// Whether a vector is a location or a velocity
///
/// Velocities also pick up the Earth angular velocity term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VectorKind {
    #[default]
    Position,
    Velocity,
}

/// Greenwich hour angle in radians, in [0, 2*PI)
///
/// `unix_time` is seconds since 1970-01-01T00:00:00Z. Nutation is ignored.
pub fn compute_gha(unix_time: f64) -> f64 {
    let whole_days = (unix_time / SECONDS_PER_DAY).trunc();
    let day_seconds = unix_time - whole_days * SECONDS_PER_DAY;

    let day_fraction = day_seconds / SECONDS_PER_DAY;
    let tu = (whole_days + J2000_FROM_UNIX_DAYS) / DAYS_PER_CENTURY;

    // sidereal seconds at 0h UT1
    let gmst0 = tu * 8640184.812866 + 24110.54841 + tu * tu * 0.093104 - tu * tu * tu * 6.2e-6;

    // sidereal seconds per solar day
    let rotation_rate = tu * 5.098097e-6 + 86636.55536790872 - tu * tu * 5.09e-10;

    let mut gmst = (gmst0 + rotation_rate * day_fraction) % SECONDS_PER_DAY;
    if gmst < 0.0 {
        gmst += SECONDS_PER_DAY;
    }

    (gmst / SECONDS_PER_DAY * 360.0).to_radians()
}

/// Greenwich hour angle at a calendar instant
pub fn gha_at(time: DateTime<Utc>) -> f64 {
    compute_gha(unix_seconds(time))
}

/// Convert an ECEF location or velocity to ECI
pub fn ecef_to_eci(unix_time: f64, ecef: &EcefCoord, kind: VectorKind) -> EciCoord {
    let gha = compute_gha(unix_time);
    let (x, y) = rotate_z(-gha, ecef.x, ecef.y);

    match kind {
        VectorKind::Position => Vector3::new(x, y, ecef.z),
        VectorKind::Velocity => {
            let (dx, dy) = omega_cross(x, y);
            Vector3::new(x + dx, y + dy, ecef.z)
        }
    }
}

/// Convert an ECI location or velocity to ECEF
pub fn eci_to_ecef(unix_time: f64, eci: &EciCoord, kind: VectorKind) -> EcefCoord {
    let gha = compute_gha(unix_time);
    let (x, y) = rotate_z(gha, eci.x, eci.y);

    match kind {
        VectorKind::Position => Vector3::new(x, y, eci.z),
        VectorKind::Velocity => {
            let (dx, dy) = omega_cross(x, y);
            Vector3::new(x - dx, y - dy, eci.z)
        }
    }
}

pub fn ecef_to_eci_at(time: DateTime<Utc>, ecef: &EcefCoord, kind: VectorKind) -> EciCoord {
    ecef_to_eci(unix_seconds(time), ecef, kind)
}

pub fn eci_to_ecef_at(time: DateTime<Utc>, eci: &EciCoord, kind: VectorKind) -> EcefCoord {
    eci_to_ecef(unix_seconds(time), eci, kind)
}

fn unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + time.timestamp_subsec_nanos() as f64 * 1e-9
}

/// Frame rotation about Z by `angle`
#[inline]
fn rotate_z(angle: f64, x: f64, y: f64) -> (f64, f64) {
    let (s, c) = angle.sin_cos();
    (c * x + s * y, -s * x + c * y)
}

/// Planar part of v x (0, 0, EARTH_OMEGA)
#[inline]
fn omega_cross(x: f64, y: f64) -> (f64, f64) {
    (y * EARTH_OMEGA, -x * EARTH_OMEGA)
}
