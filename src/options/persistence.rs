use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Recording", inline)]
#[serde(default)]
/// Image-sequence output of the reprojected frames.
pub struct PersistenceOptions {
    /// Write every output frame to disk.
    #[schemars(title = "Record Frames")]
    pub enabled: bool,
    /// Base name of the output directory. A numeric suffix is appended when
    /// the name is taken.
    #[schemars(skip)]
    pub folder: PathBuf,
    /// Fixed capture rate while recording, in frames per second.
    #[schemars(title = "Frame Rate", range(min = 1, max = 120))]
    pub frame_rate: u32,
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            folder: PathBuf::from("ScreenshotMovieOutput"),
            frame_rate: 25,
        }
    }
}
