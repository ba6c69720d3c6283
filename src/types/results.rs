use std::fmt;

use super::DeviationEvent;

/// Result of one mission loop iteration
#[derive(Debug, Clone, PartialEq)]
pub enum IterationOutcome {
    Completed {
        sequence: u64,
        motion: bool,
        deviation: Option<DeviationEvent>,
    },
    Failed {
        sequence: u64,
        category: &'static str,
        message: String,
    },
}

impl IterationOutcome {
    pub fn sequence(&self) -> u64 {
        match self {
            IterationOutcome::Completed { sequence, .. } => *sequence,
            IterationOutcome::Failed { sequence, .. } => *sequence,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, IterationOutcome::Completed { .. })
    }
}

/// Mission loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionState {
    Running,
    Complete,
}

/// Counters reported when the mission ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionSummary {
    pub iterations: u64,
    pub failed_iterations: u64,
    pub rows_written: u64,
    pub motion_events: u64,
    pub deviation_events: u64,
    pub state: MissionState,
}

impl MissionSummary {
    pub fn new() -> Self {
        Self {
            iterations: 0,
            failed_iterations: 0,
            rows_written: 0,
            motion_events: 0,
            deviation_events: 0,
            state: MissionState::Running,
        }
    }

    pub fn record(&mut self, outcome: &IterationOutcome) {
        self.iterations += 1;
        match outcome {
            IterationOutcome::Completed { motion, deviation, .. } => {
                if *motion {
                    self.motion_events += 1;
                }
                if deviation.is_some() {
                    self.deviation_events += 1;
                }
            }
            IterationOutcome::Failed { .. } => self.failed_iterations += 1,
        }
    }
}

impl Default for MissionSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MissionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations ({} failed), {} rows written, {} motion events, {} deviation events",
            self.iterations,
            self.failed_iterations,
            self.rows_written,
            self.motion_events,
            self.deviation_events
        )
    }
}
