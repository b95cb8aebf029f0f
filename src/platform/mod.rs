//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (monotonic milliseconds)

pub mod time;

pub use time::{Clock, ManualClock, MonotonicClock};
