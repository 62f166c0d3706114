use nalgebra::Vector3;
use thiserror::Error;

/// Common errors across the positioning core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Trilateration error: {0}")]
    Trilateration(#[from] TrilaterationError),

    #[error("Intersection error: {0}")]
    Intersection(#[from] IntersectionError),
}

/// Inputs rejected before any computation takes place
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid datum: equatorial radius {equatorial} must exceed polar radius {polar} > 0")]
    InvalidDatum { equatorial: f64, polar: f64 },

    #[error("Too few anchors: {0} (at least 3 required)")]
    TooFewAnchors(usize),

    #[error("Too many anchors: {0} (at most 4 supported)")]
    TooManyAnchors(usize),

    #[error("Negative range {range} for anchor {index}")]
    NegativeRange { index: usize, range: f64 },

    #[error("Non-finite value for anchor {0}")]
    NonFinite(usize),

    #[error("Missing ranges: expected {expected}, got {found}")]
    MissingRanges { expected: usize, found: usize },

    #[error("Fourth anchor required for range disambiguation")]
    MissingFourthAnchor,

    #[error("Output buffer length {found} does not match input length {expected}")]
    BufferLength { expected: usize, found: usize },
}

/// Geometric configurations that cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Two of the first three sphere centers coincide
    Concentric,
    /// The three sphere centers are on a line and no unique solution exists
    Colinear2Solutions,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrilaterationError {
    #[error("Degenerate anchor geometry: {0:?}")]
    DegenerateGeometry(Degeneracy),

    #[error("No real solution (negative discriminant)")]
    NoRealSolution,

    #[error("No solution after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },
}

impl TrilaterationError {
    /// Failures that growing the radii may fix
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DegenerateGeometry(Degeneracy::Concentric))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntersectionError {
    #[error("Ray does not intersect the ellipsoid")]
    NoIntersection { sentinel: Vector3<f64> },
}

pub type Result<T> = std::result::Result<T, GeolocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trilateration_error_display() {
        let err = TrilaterationError::DegenerateGeometry(Degeneracy::Concentric);
        assert_eq!(err.to_string(), "Degenerate anchor geometry: Concentric");

        let err = TrilaterationError::NoRealSolution;
        assert_eq!(err.to_string(), "No real solution (negative discriminant)");

        let err = TrilaterationError::ExhaustedRetries { attempts: 24 };
        assert_eq!(err.to_string(), "No solution after 24 attempts");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::TooFewAnchors(2);
        assert_eq!(err.to_string(), "Too few anchors: 2 (at least 3 required)");

        let err = ValidationError::NegativeRange { index: 1, range: -0.5 };
        assert_eq!(err.to_string(), "Negative range -0.5 for anchor 1");

        let err = ValidationError::BufferLength { expected: 4, found: 3 };
        assert_eq!(err.to_string(), "Output buffer length 3 does not match input length 4");
    }

    #[test]
    fn test_recoverable_failures() {
        assert!(!TrilaterationError::DegenerateGeometry(Degeneracy::Concentric).is_recoverable());
        assert!(
            TrilaterationError::DegenerateGeometry(Degeneracy::Colinear2Solutions).is_recoverable()
        );
        assert!(TrilaterationError::NoRealSolution.is_recoverable());
    }

    #[test]
    fn test_geoloc_error_from_validation_error() {
        let err: GeolocError = ValidationError::MissingFourthAnchor.into();
        assert!(matches!(err, GeolocError::Validation(_)));
    }

    #[test]
    fn test_geoloc_error_from_trilateration_error() {
        let err: GeolocError = TrilaterationError::NoRealSolution.into();
        assert!(matches!(err, GeolocError::Trilateration(_)));
        assert_eq!(
            err.to_string(),
            "Trilateration error: No real solution (negative discriminant)"
        );
    }

    #[test]
    fn test_geoloc_error_from_intersection_error() {
        let err: GeolocError = IntersectionError::NoIntersection {
            sentinel: Vector3::zeros(),
        }
        .into();
        assert!(matches!(err, GeolocError::Intersection(_)));
    }
}
