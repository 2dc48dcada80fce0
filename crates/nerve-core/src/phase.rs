use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Phase angle of one variation step on the unit circle.
///
/// Step `i` of `steps` sits at `2π·i/steps`. Its cosine, mapped from
/// [-1, 1] onto an index range, gives a half-cosine sweep that lingers near
/// the ends of the range and moves fastest through the middle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepPhase {
    pub theta: f64,
}

impl StepPhase {
    /// Phase for step `step` of `steps`. `steps == 0` is treated as one step.
    pub fn from_step(step: usize, steps: usize) -> Self {
        let steps = steps.max(1);
        Self {
            theta: TAU * step as f64 / steps as f64,
        }
    }

    /// cos(theta), in [-1, 1].
    pub fn sample(self) -> f64 {
        self.theta.cos()
    }

    /// Map the sample onto `[0, n)`: `round(((s + 1) / 2) · (n − 1))`, with
    /// exact halves rounding to the even index. Returns 0 for `n <= 1`.
    pub fn index(self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        let unit = (self.sample() + 1.0) / 2.0;
        let idx = (unit * (n - 1) as f64).round_ties_even();
        (idx.max(0.0) as usize).min(n - 1)
    }
}

/// Index sequence visited by `steps` variation steps over `n` candidates.
pub fn sweep_indices(steps: usize, n: usize) -> Vec<usize> {
    (0..steps)
        .map(|i| StepPhase::from_step(i, steps).index(n))
        .collect()
}
