//! Look-ray intersection with a reference ellipsoid

mod ellipsoid;

pub use ellipsoid::{intersect, EllipsoidIntersector, IntersectionResult};
