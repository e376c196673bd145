//! Input handling: event types and the processor that folds raw window
//! events into one snapshot per tick.

/// Platform-agnostic input events.
pub mod event;
/// Bindable key actions.
pub mod keyboard;
/// Converts raw events into per-tick input snapshots.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use processor::{FrameInput, InputProcessor};
