//! Timer snapshot structure published to the UI

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Notice, TimerPhase};

/// Everything the UI needs to render one frame of the timer screen.
///
/// Snapshots are published whole through a watch channel whenever the
/// controller mutates state, so observers never see a half-applied
/// transition.
#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    /// Current state machine phase
    pub phase: TimerPhase,
    /// Duration text being edited, meaningful only while `Idle`
    pub input: String,
    /// Seconds counted up since start, meaningful only while `Running`
    pub elapsed_seconds: u64,
    /// Duration committed at start time, fixed for the life of a run
    pub total_seconds: u64,
    /// Transient validation message for the last rejected start
    pub notice: Option<Notice>,
    /// Wall-clock time of the last start, for the status line
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerSnapshot {
    /// Create the initial snapshot: idle, empty input
    pub fn new() -> Self {
        Self {
            phase: TimerPhase::Idle,
            input: String::new(),
            elapsed_seconds: 0,
            total_seconds: 0,
            notice: None,
            started_at: None,
        }
    }

    /// Seconds left on the countdown readout
    pub fn remaining_seconds(&self) -> u64 {
        self.total_seconds.saturating_sub(self.elapsed_seconds)
    }

    /// Fraction of the run completed, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.elapsed_seconds as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
