//! Shared utilities.

/// Frame counter with an optional fixed time step.
pub mod frame_clock;

pub use frame_clock::FrameClock;
