//! Tickdown - a single-screen countdown timer for the terminal
//!
//! This library provides a countdown state machine driven by a
//! once-per-second tick source, plus the terminal UI that observes it.

pub mod config;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{TimerController, TimerPhase, TimerSnapshot};
pub use utils::signals::shutdown_signal;
