use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lens::LensKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Projection", inline)]
#[serde(default)]
/// Lens selection and field-of-view control.
pub struct ProjectionOptions {
    /// Lens kind active after start.
    #[schemars(title = "Lens")]
    pub lens: LensKind,
    /// Initial field of view in degrees, clamped to the lens kind's range.
    #[schemars(title = "Field of View", range(min = 1.0, max = 360.0), extend("step" = 1.0))]
    pub fov: f32,
    /// Degrees of field of view per unit of scroll.
    #[schemars(title = "Zoom Sensitivity", range(min = 0.1, max = 20.0), extend("step" = 0.1))]
    pub fov_sensitivity: f32,
    /// Sensor pixel pitch in micrometres.
    #[schemars(skip)]
    pub pixel_pitch: f32,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            lens: LensKind::Equirectangular,
            fov: 360.0,
            fov_sensitivity: 2.0,
            pixel_pitch: 1.0,
        }
    }
}
