use serde::{Deserialize, Serialize};

/// Tunables of the multilateration solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultilaterationConfig {
    /// Largest distance still considered zero (meters)
    pub epsilon: f64,
    /// Radius growth applied to every sphere per retry (meters)
    pub inflation_step: f64,
    /// Retries per anchor ordering after a recoverable failure
    pub max_retries: usize,
    /// Number of anchor orderings to try, 1 to 4
    pub combinations: usize,
}

impl Default for MultilaterationConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.001,
            inflation_step: 0.10,
            max_retries: 5,
            combinations: 4,
        }
    }
}
