//! Synthesis configuration.

use serde::{Deserialize, Serialize};

/// Tunables for curve synthesis. Passed explicitly into every builder that
/// needs one; the engine keeps no ambient state.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthConfig {
    /// Sampling density (Hz) for nested blending. The sample count of a span
    /// is always proportional to its duration at this rate.
    pub samples_per_second: f32,
    /// Maximum deviation allowed when reducing sampled spans to
    /// piecewise-linear keys.
    pub fit_max_error: f32,
    /// Maximum deviation allowed when reducing a quartic/quintic easing to
    /// cubic-Hermite segments.
    pub reduce_tolerance: f32,
    /// Maximum bisection depth for the quartic/quintic reduction.
    pub reduce_max_depth: u32,
    /// Substitute for bezier weights of exactly 0 or 1, which would otherwise
    /// divide by zero when deriving the reciprocal tangent.
    pub weight_epsilon: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            samples_per_second: 60.0,
            fit_max_error: 0.01,
            reduce_tolerance: 0.001,
            reduce_max_depth: 10,
            weight_epsilon: 1e-5,
        }
    }
}
