use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_ANCHORS: usize = 3;
pub const MAX_ANCHORS: usize = 4;

/// Anchor orderings tried by the locator, each a rotation of the previous one
pub(crate) const ROTATIONS: [[usize; 4]; 4] =
    [[0, 1, 2, 3], [1, 2, 3, 0], [2, 3, 0, 1], [3, 0, 1, 2]];

/// Fixed reference point and the measured distance to it (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub position: Vector3<f64>,
    pub range: f64,
}

impl Anchor {
    pub fn new(position: Vector3<f64>, range: f64) -> Self {
        Self { position, range }
    }

    /// Same center, radius grown by `delta`
    pub fn inflated(&self, delta: f64) -> Self {
        Self {
            position: self.position,
            range: self.range + delta,
        }
    }

    /// Distance from `point` minus the measured range
    pub fn residual(&self, point: &Vector3<f64>) -> f64 {
        (point - self.position).norm() - self.range
    }
}

/// Three or four validated anchors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAnchorSet")]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
}

/// Unchecked wire form of [`AnchorSet`]
#[derive(Deserialize)]
struct RawAnchorSet {
    anchors: Vec<Anchor>,
}

impl TryFrom<RawAnchorSet> for AnchorSet {
    type Error = ValidationError;

    fn try_from(raw: RawAnchorSet) -> Result<Self, Self::Error> {
        Self::new(raw.anchors)
    }
}

impl AnchorSet {
    pub fn new(anchors: Vec<Anchor>) -> Result<Self, ValidationError> {
        if anchors.len() < MIN_ANCHORS {
            return Err(ValidationError::TooFewAnchors(anchors.len()));
        }
        if anchors.len() > MAX_ANCHORS {
            return Err(ValidationError::TooManyAnchors(anchors.len()));
        }

        for (index, anchor) in anchors.iter().enumerate() {
            if !anchor.range.is_finite() || !anchor.position.iter().all(|c| c.is_finite()) {
                return Err(ValidationError::NonFinite(index));
            }
            if anchor.range < 0.0 {
                return Err(ValidationError::NegativeRange {
                    index,
                    range: anchor.range,
                });
            }
        }

        Ok(Self { anchors })
    }

    /// Build from parallel position/range slices
    pub fn from_parts(positions: &[Vector3<f64>], ranges: &[f64]) -> Result<Self, ValidationError> {
        if ranges.len() < positions.len() {
            return Err(ValidationError::MissingRanges {
                expected: positions.len(),
                found: ranges.len(),
            });
        }
        Self::new(
            positions
                .iter()
                .zip(ranges)
                .map(|(&position, &range)| Anchor::new(position, range))
                .collect(),
        )
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Whether a distinct fourth sphere is available for disambiguation
    pub fn has_fourth(&self) -> bool {
        self.anchors.len() == MAX_ANCHORS
    }

    /// The four spheres handed to the solver for one anchor ordering
    ///
    /// A three-anchor set repeats its first anchor in the fourth slot, which
    /// makes the solver stop at the two-candidate answer.
    pub(crate) fn spheres(&self, rotation: &[usize; 4]) -> [Anchor; 4] {
        let fourth = self.anchors.get(3).copied().unwrap_or(self.anchors[0]);
        let all = [self.anchors[0], self.anchors[1], self.anchors[2], fourth];
        (*rotation).map(|i| all[i])
    }
}
