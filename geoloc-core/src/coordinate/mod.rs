//! Coordinate system transformations

mod batch;
mod datum;
mod great_circle;
mod inertial;
mod local;
mod transforms;

pub use batch::{ecef_to_lla_into, lla_to_ecef_into, par_ecef_to_lla, par_lla_to_ecef};
pub use datum::{EllipsoidDatum, WGS84};
pub use great_circle::{
    bearing, equirectangular_distance, haversine_distance, intermediate_point,
    law_of_cosines_distance, DistanceFormula, LatLon, MEAN_EARTH_RADIUS,
};
pub use inertial::{
    compute_gha, ecef_to_eci, ecef_to_eci_at, eci_to_ecef, eci_to_ecef_at, gha_at, EciCoord,
    VectorKind, EARTH_OMEGA,
};
pub use local::{ecef_to_enu, enu_direction_to_ecef, enu_rotation, enu_to_ecef};
pub use transforms::{ecef_to_lla, lla_to_ecef, normalize_longitude, EcefCoord, LlaCoord};
