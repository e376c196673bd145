use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Discrete operator actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// reset_orientation = "KeyH"
/// next_lens = "Tab"
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Snap the arcball back to its initial orientation.
    ResetOrientation,
    /// Flip the display-only overlay flag.
    ToggleOverlay,
    /// Show or hide the host's control panel.
    ToggleGui,
    /// Switch to the following lens kind.
    NextLens,
    /// Switch to the preceding lens kind.
    PreviousLens,
}
