//! Point location from ranges to known anchors

mod anchor;
mod config;
mod locate;
mod sphere;
mod trilaterate;

pub use anchor::{Anchor, AnchorSet, MAX_ANCHORS, MIN_ANCHORS};
pub use config::MultilaterationConfig;
pub use locate::{get_location, locate, Disambiguation, Multilaterator, TrilaterationResult};
pub use sphere::{gdop_rate, rms_residual, sphere_line};
pub use trilaterate::{trilaterate, SphereFix};
