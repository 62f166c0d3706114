use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::anchor::{Anchor, AnchorSet, MIN_ANCHORS, ROTATIONS};
use super::config::MultilaterationConfig;
use super::sphere::rms_residual;
use super::trilaterate::{trilaterate, SphereFix};
use crate::error::{Result, TrilaterationError, ValidationError};

/// Outcome of locating a point from an anchor set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrilaterationResult {
    /// Two mirror candidates, to be resolved by the caller
    ThreeSphere {
        candidate1: Vector3<f64>,
        candidate2: Vector3<f64>,
    },
    /// Single fix from the anchor ordering with the best geometry
    FourSphere {
        best: Vector3<f64>,
        gdop_rate: f64,
        /// RMS of the residuals against the measured (uninflated) ranges
        rms_residual: f64,
        retries_used: usize,
    },
    Failed { reason: TrilaterationError },
}

impl TrilaterationResult {
    /// The fix when the result is unambiguous
    pub fn position(&self) -> Option<Vector3<f64>> {
        match self {
            Self::FourSphere { best, .. } => Some(*best),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Rule for picking one of two mirror candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Disambiguation {
    /// The point lies below the plane of the anchors (ceiling-mounted anchors)
    #[default]
    BelowAnchorPlane,
    /// The point whose distance to anchor 4 best matches its measured range
    FourthAnchorRange,
}

impl Disambiguation {
    pub fn choose(
        &self,
        candidate1: &Vector3<f64>,
        candidate2: &Vector3<f64>,
        anchors: &AnchorSet,
    ) -> std::result::Result<Vector3<f64>, ValidationError> {
        match self {
            Self::BelowAnchorPlane => {
                let reference = anchors.anchors()[0].position;
                if candidate1.z < reference.z {
                    Ok(*candidate1)
                } else {
                    Ok(*candidate2)
                }
            }
            Self::FourthAnchorRange => {
                let fourth = anchors.anchors().get(3).ok_or(ValidationError::MissingFourthAnchor)?;
                if fourth.residual(candidate1).abs() < fourth.residual(candidate2).abs() {
                    Ok(*candidate1)
                } else {
                    Ok(*candidate2)
                }
            }
        }
    }
}

/// Range-based point locator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Multilaterator {
    config: MultilaterationConfig,
}

impl Multilaterator {
    pub fn new(config: MultilaterationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MultilaterationConfig {
        &self.config
    }

    /// Locate a point from 3 or 4 ranged anchors
    ///
    /// Every anchor ordering (up to `combinations`) is solved independently,
    /// growing all radii by `inflation_step` after each recoverable failure.
    /// The four-sphere fix with the lowest GDOP rate wins. A three-anchor set
    /// has a single ordering and always ends as `ThreeSphere` or `Failed`.
    pub fn locate(&self, anchors: &AnchorSet) -> TrilaterationResult {
        let combinations = if anchors.has_fourth() {
            self.config.combinations.clamp(1, ROTATIONS.len())
        } else {
            1
        };

        let mut best: Option<TrilaterationResult> = None;
        let mut best_gdop = f64::INFINITY;
        let mut failures = Vec::with_capacity(combinations);

        for (combination, rotation) in ROTATIONS.iter().take(combinations).enumerate() {
            match self.solve_with_retries(combination, anchors.spheres(rotation)) {
                Ok((SphereFix::ThreeSphere { candidate1, candidate2 }, retries_used)) => {
                    trace!(combination, retries_used, "Three-sphere fix");
                    if best.is_none() {
                        return TrilaterationResult::ThreeSphere { candidate1, candidate2 };
                    }
                    break;
                }
                Ok((SphereFix::FourSphere { best: point, gdop_rate }, retries_used)) => {
                    trace!(combination, retries_used, gdop_rate, "Four-sphere fix");
                    if gdop_rate < best_gdop {
                        best_gdop = gdop_rate;
                        best = Some(TrilaterationResult::FourSphere {
                            best: point,
                            gdop_rate,
                            rms_residual: rms_residual(&point, anchors.anchors()),
                            retries_used,
                        });
                    }
                }
                Err(error) => {
                    debug!(combination, %error, "Anchor combination abandoned");
                    failures.push(error);
                }
            }
        }

        if let Some(result) = best {
            return result;
        }

        let reason = combine_failures(&failures);
        debug!(combinations, %reason, "No anchor combination produced a fix");
        TrilaterationResult::Failed { reason }
    }

    /// Solve one anchor ordering, inflating the radii after recoverable failures
    fn solve_with_retries(
        &self,
        combination: usize,
        spheres: [Anchor; 4],
    ) -> std::result::Result<(SphereFix, usize), TrilaterationError> {
        let mut retries = 0;
        loop {
            let delta = self.config.inflation_step * retries as f64;
            let attempt = spheres.map(|sphere| sphere.inflated(delta));

            match trilaterate(&attempt, self.config.epsilon) {
                Ok(fix) => return Ok((fix, retries)),
                Err(error) if error.is_recoverable() && retries < self.config.max_retries => {
                    retries += 1;
                    debug!(combination, retries, %error, "Inflating sphere radii");
                }
                Err(TrilaterationError::NoRealSolution) if retries > 0 => {
                    return Err(TrilaterationError::ExhaustedRetries { attempts: retries + 1 });
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Position from raw anchor positions and millimeter ranges
    ///
    /// Only the first three anchors are trilaterated. The two candidates are
    /// resolved with `disambiguation`, which for `FourthAnchorRange` needs a
    /// fourth anchor and its range.
    pub fn get_location(
        &self,
        anchors: &[Vector3<f64>],
        ranges_mm: &[i32],
        disambiguation: Disambiguation,
    ) -> Result<Vector3<f64>> {
        let ranges: Vec<f64> = ranges_mm.iter().map(|&mm| f64::from(mm) / 1000.0).collect();
        let anchors = AnchorSet::from_parts(anchors, &ranges)?;

        if disambiguation == Disambiguation::FourthAnchorRange && !anchors.has_fourth() {
            return Err(ValidationError::MissingFourthAnchor.into());
        }

        let primary = AnchorSet::new(anchors.anchors()[..MIN_ANCHORS].to_vec())?;

        match self.locate(&primary) {
            TrilaterationResult::ThreeSphere { candidate1, candidate2 } => {
                Ok(disambiguation.choose(&candidate1, &candidate2, &anchors)?)
            }
            TrilaterationResult::FourSphere { best, .. } => Ok(best),
            TrilaterationResult::Failed { reason } => Err(reason.into()),
        }
    }
}

/// Single failure reason for a run where every combination failed
fn combine_failures(failures: &[TrilaterationError]) -> TrilaterationError {
    let exhausted: Option<usize> = failures
        .iter()
        .map(|failure| match failure {
            TrilaterationError::ExhaustedRetries { attempts } => Some(*attempts),
            _ => None,
        })
        .sum();

    match (exhausted, failures.first()) {
        (Some(attempts), _) if attempts > 0 => TrilaterationError::ExhaustedRetries { attempts },
        (_, Some(first)) => *first,
        (_, None) => TrilaterationError::NoRealSolution,
    }
}

/// Locate with the default tunables, trying up to `combinations_to_try` orderings
pub fn locate(anchors: &AnchorSet, combinations_to_try: usize) -> TrilaterationResult {
    Multilaterator::new(MultilaterationConfig {
        combinations: combinations_to_try,
        ..MultilaterationConfig::default()
    })
    .locate(anchors)
}

/// Position from anchors and millimeter ranges with the default tunables
///
/// With `use_fourth_anchor` the candidate matching the fourth range is
/// picked, otherwise the one below the anchor plane.
pub fn get_location(
    anchors: &[Vector3<f64>],
    ranges_mm: &[i32],
    use_fourth_anchor: bool,
) -> Result<Vector3<f64>> {
    let disambiguation = if use_fourth_anchor {
        Disambiguation::FourthAnchorRange
    } else {
        Disambiguation::BelowAnchorPlane
    };
    Multilaterator::default().get_location(anchors, ranges_mm, disambiguation)
}
