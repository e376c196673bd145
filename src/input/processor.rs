//! Folds raw platform events into one [`FrameInput`] per tick.
//!
//! The `InputProcessor` owns the transient input state (pointer position,
//! primary button, the release edge, accumulated scroll) and the key-binding
//! map. It is the only thing that sits between raw window events and
//! [`ProjectionManager::on_tick`](crate::projection::ProjectionManager::on_tick).

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::keyboard::KeyAction;
use crate::options::KeybindingOptions;

/// Input state for a single tick.
///
/// Level-triggered fields (`pointer`, `primary_held`) reflect the state at
/// the end of the tick; edge-triggered fields (`primary_released`,
/// `scroll`, `actions`) cover only events since the previous tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in physical pixels.
    pub pointer: Vec2,
    /// Whether the primary button is held.
    pub primary_held: bool,
    /// Whether the primary button went up during the tick.
    pub primary_released: bool,
    /// Accumulated scroll delta (positive = zoom in).
    pub scroll: f32,
    /// Bound key actions in the order they were pressed.
    pub actions: Vec<KeyAction>,
    /// Last reported viewport size, if the host reported one.
    pub viewport: Option<(u32, u32)>,
}

impl FrameInput {
    /// Whether `action` was triggered during the tick.
    #[must_use]
    pub fn triggered(&self, action: KeyAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Converts raw window events into per-tick [`FrameInput`] snapshots.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// input_processor.handle_event(event);
///
/// // Once per frame:
/// let frame = input_processor.take_frame();
/// manager.on_tick(dt, &frame);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Snapshot being accumulated for the current tick.
    pending: FrameInput,
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pending.pointer
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn primary_held(&self) -> bool {
        self.pending.primary_held
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeybindingOptions {
        &mut self.key_bindings
    }

    /// Look up a key press and queue the bound action, if any.
    pub fn handle_key_press(&mut self, key: &str) -> Option<KeyAction> {
        let action = self.key_bindings.lookup(key)?;
        self.pending.actions.push(action);
        Some(action)
    }

    /// Fold a raw input event into the pending snapshot.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.pending.pointer = Vec2::new(x, y);
            }
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed);
            }
            InputEvent::Scroll { delta } => self.pending.scroll += delta,
            InputEvent::Resized { width, height } => {
                self.pending.viewport = Some((width, height));
            }
            InputEvent::KeyPressed { key } => {
                if self.handle_key_press(&key).is_none() {
                    log::trace!("unbound key {key}");
                }
            }
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if button != MouseButton::Left {
            return;
        }
        if pressed {
            self.pending.primary_held = true;
        } else if self.pending.primary_held {
            self.pending.primary_held = false;
            self.pending.primary_released = true;
        }
    }

    /// Hand out the snapshot for this tick and clear the edge-triggered
    /// state. Pointer position, the held flag and the viewport size carry
    /// over.
    pub fn take_frame(&mut self) -> FrameInput {
        let next = FrameInput {
            pointer: self.pending.pointer,
            primary_held: self.pending.primary_held,
            viewport: self.pending.viewport,
            ..FrameInput::default()
        };
        std::mem::replace(&mut self.pending, next)
    }
}
