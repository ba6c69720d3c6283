use crate::types::{Axis, AxisSet, DeviationEvent, Vector3};
use crate::utils::round_to;

/// Default per-axis deviation threshold, in g.
pub const DEFAULT_THRESHOLD: f64 = 0.005;

/// Compares a current acceleration read against the baseline read taken
/// immediately before it. The baseline is replaced on every iteration; there
/// is no averaging window.
#[derive(Debug, Clone)]
pub struct BaselineTracker {
    threshold: f64,
    reference: Option<Vector3>,
}

impl BaselineTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            reference: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[cfg(test)]
    pub fn baseline(&self) -> Option<Vector3> {
        self.reference
    }

    /// Overwrite the reference acceleration.
    pub fn set_baseline(&mut self, reading: Vector3) {
        self.reference = Some(reading);
    }

    /// Compare `current` against the stored baseline. Without a baseline the
    /// reading is compared against itself and nothing deviates.
    pub fn compare(&self, current: Vector3) -> DeviationEvent {
        let baseline = self.reference.unwrap_or(current);
        Self::deviation(baseline, current, self.threshold)
    }

    /// Per-axis `round(current - baseline, 3)`, flagged when `|delta| > threshold`.
    pub fn deviation(baseline: Vector3, current: Vector3, threshold: f64) -> DeviationEvent {
        let delta = Vector3::new(
            round_to(current.x - baseline.x, 3),
            round_to(current.y - baseline.y, 3),
            round_to(current.z - baseline.z, 3),
        );

        let mut axes = AxisSet::EMPTY;
        for axis in Axis::ALL {
            if axis.component(&delta).abs() > threshold {
                axes.insert(axis);
            }
        }

        DeviationEvent { axes, delta }
    }
}

impl Default for BaselineTracker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
