//! Background tasks module
//!
//! This module contains the tick source task that drives a running
//! countdown alongside the UI event loop.

pub mod ticker;

// Re-export main functions
pub use ticker::{spawn_ticker, TickerHandle};
