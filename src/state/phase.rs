//! Timer phase and input validation notices

use serde::Serialize;

/// The three states of the countdown state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerPhase {
    /// Waiting for a duration to be entered
    Idle,
    /// Counting down, one tick per second
    Running,
    /// The countdown reached zero
    Finished,
}

impl TimerPhase {
    /// Check if the input field is editable in this phase
    pub fn input_editable(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Why the last start request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Notice {
    /// Start pressed with an empty input field
    EmptyInput,
    /// Input contained something other than digits
    NotANumber,
    /// Input exceeded the supported maximum duration
    TooLarge,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "enter a duration first"),
            Self::NotANumber => write!(f, "whole seconds only"),
            Self::TooLarge => write!(f, "maximum is {} seconds", super::MAX_DURATION_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_editable_only_while_idle() {
        assert!(TimerPhase::Idle.input_editable());
        assert!(!TimerPhase::Running.input_editable());
        assert!(!TimerPhase::Finished.input_editable());
    }

    #[test]
    fn notices_render_as_short_messages() {
        assert_eq!(Notice::EmptyInput.to_string(), "enter a duration first");
        assert_eq!(Notice::TooLarge.to_string(), "maximum is 359999 seconds");
    }
}
