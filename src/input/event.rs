/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// folds them into the [`FrameInput`](super::FrameInput) consumed once per
/// tick.
///
/// # Example
///
/// ```ignore
/// input.handle_event(InputEvent::CursorMoved { x: 100.0, y: 200.0 });
/// input.handle_event(InputEvent::KeyPressed { key: "KeyH".into() });
/// let frame = input.take_frame();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in, narrowing the field of view).
    Scroll {
        /// Scroll amount.
        delta: f32,
    },
    /// The viewport changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// A physical key went down.
    KeyPressed {
        /// Key string in `winit::keyboard::KeyCode` debug format
        /// (`"KeyH"`, `"Tab"`, ...).
        key: String,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}
