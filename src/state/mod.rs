//! Timer state module
//!
//! This module contains the timer state machine, its published snapshot
//! form, and the controller that owns them.

pub mod controller;
pub mod phase;
pub mod snapshot;

// Re-export main types
pub use controller::{TimerController, INPUT_MAX_DIGITS, MAX_DURATION_SECS};
pub use phase::{Notice, TimerPhase};
pub use snapshot::TimerSnapshot;

pub(crate) use controller::TickOutcome;
