use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// When the cube map is captured relative to the rest of the scene's
/// per-frame updates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CaptureTiming {
    /// Capture during the tick, before other objects update.
    BeforeScene,
    /// Capture in the late tick, so trailing effects of the same frame are
    /// included.
    #[default]
    AfterScene,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Capture", inline)]
#[serde(default)]
/// Cube-map capture and reprojection buffers.
pub struct CaptureOptions {
    /// Edge length of each cube face in pixels (power of two).
    #[schemars(title = "Cube Map Size", range(min = 64, max = 8192))]
    pub cubemap_size: u32,
    /// Height of the reprojected output; its width is twice this.
    #[schemars(title = "Output Size", range(min = 64, max = 8192))]
    pub output_size: u32,
    /// Whether the reprojection pass runs at all.
    #[schemars(title = "Create Output Map")]
    pub create_output_map: bool,
    /// When the capture runs within a frame.
    #[schemars(title = "Capture Timing")]
    pub timing: CaptureTiming,
    /// Initial state of the display-only overlay.
    #[schemars(title = "Show Overlay")]
    pub show_overlay: bool,
    /// Seconds between viewport-size checks.
    #[schemars(skip)]
    pub resize_poll_secs: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            cubemap_size: 2048,
            output_size: 2048,
            create_output_map: true,
            timing: CaptureTiming::AfterScene,
            show_overlay: false,
            resize_poll_secs: 0.3,
        }
    }
}
