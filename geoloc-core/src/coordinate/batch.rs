//! Slice conversions for hot paths
//!
//! The `_into` variants write into caller-owned buffers and never allocate.
//! The `par_` variants spread the work across the rayon thread pool.

use rayon::prelude::*;

use super::datum::EllipsoidDatum;
use super::transforms::{ecef_to_lla, lla_to_ecef, EcefCoord, LlaCoord};
use crate::error::ValidationError;

fn check_len(expected: usize, found: usize) -> Result<(), ValidationError> {
    if expected != found {
        return Err(ValidationError::BufferLength { expected, found });
    }
    Ok(())
}

/// Convert every LLA in `input` into the matching slot of `output`
pub fn lla_to_ecef_into(
    input: &[LlaCoord],
    datum: &EllipsoidDatum,
    output: &mut [EcefCoord],
) -> Result<(), ValidationError> {
    check_len(input.len(), output.len())?;
    for (lla, ecef) in input.iter().zip(output.iter_mut()) {
        *ecef = lla_to_ecef(lla, datum);
    }
    Ok(())
}

/// Convert every ECEF in `input` into the matching slot of `output`
pub fn ecef_to_lla_into(
    input: &[EcefCoord],
    datum: &EllipsoidDatum,
    output: &mut [LlaCoord],
) -> Result<(), ValidationError> {
    check_len(input.len(), output.len())?;
    for (ecef, lla) in input.iter().zip(output.iter_mut()) {
        *lla = ecef_to_lla(ecef, datum);
    }
    Ok(())
}

pub fn par_lla_to_ecef(input: &[LlaCoord], datum: &EllipsoidDatum) -> Vec<EcefCoord> {
    input.par_iter().map(|lla| lla_to_ecef(lla, datum)).collect()
}

pub fn par_ecef_to_lla(input: &[EcefCoord], datum: &EllipsoidDatum) -> Vec<LlaCoord> {
    input.par_iter().map(|ecef| ecef_to_lla(ecef, datum)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::datum::WGS84;

    fn sample_points() -> Vec<LlaCoord> {
        (0..64)
            .map(|i| {
                let f = i as f64;
                LlaCoord::from_degrees(-170.0 + f * 5.0, -80.0 + f * 2.5, f * 100.0)
            })
            .collect()
    }

    #[test]
    fn test_into_matches_scalar() {
        let input = sample_points();
        let mut output = vec![EcefCoord::zeros(); input.len()];
        lla_to_ecef_into(&input, &WGS84, &mut output).unwrap();

        for (lla, ecef) in input.iter().zip(&output) {
            assert_eq!(*ecef, lla_to_ecef(lla, &WGS84));
        }
    }

    #[test]
    fn test_into_roundtrip() {
        let input = sample_points();
        let mut ecef = vec![EcefCoord::zeros(); input.len()];
        let mut lla = vec![LlaCoord::default(); input.len()];

        lla_to_ecef_into(&input, &WGS84, &mut ecef).unwrap();
        ecef_to_lla_into(&ecef, &WGS84, &mut lla).unwrap();

        for (a, b) in input.iter().zip(&lla) {
            assert!((a.lat - b.lat).abs() < 1e-8);
            assert!((a.alt - b.alt).abs() < 1e-3);
        }
    }

    #[test]
    fn test_buffer_length_mismatch() {
        let input = sample_points();
        let mut output = vec![EcefCoord::zeros(); 3];
        let err = lla_to_ecef_into(&input, &WGS84, &mut output).unwrap_err();
        assert_eq!(err, ValidationError::BufferLength { expected: 64, found: 3 });
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = sample_points();
        let parallel = par_lla_to_ecef(&input, &WGS84);
        let mut sequential = vec![EcefCoord::zeros(); input.len()];
        lla_to_ecef_into(&input, &WGS84, &mut sequential).unwrap();
        assert_eq!(parallel, sequential);

        let back = par_ecef_to_lla(&parallel, &WGS84);
        assert_eq!(back.len(), input.len());
        assert!((back[10].lon - input[10].lon).abs() < 1e-9);
    }
}
