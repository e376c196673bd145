use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::OmniError;

/// File name for frame `frame`: `shot NNNN.png`.
#[must_use]
pub fn frame_file_name(frame: u64) -> String {
    format!("shot {frame:04}.png")
}

/// Writes frames into a fresh directory, created once per run.
#[derive(Debug, Clone)]
pub struct FrameSink {
    base: PathBuf,
    directory: Option<PathBuf>,
}

impl FrameSink {
    /// Sink writing under `base`, or `base1`, `base2`, ... if taken.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            directory: None,
        }
    }

    /// Output directory, once created.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Create the output directory on first use: the first of `base`,
    /// `base1`, `base2`, ... that does not exist yet.
    pub fn ensure_directory(&mut self) -> Result<&Path, OmniError> {
        if self.directory.is_none() {
            let dir = self.unused_directory()?;
            std::fs::create_dir_all(&dir)?;
            log::info!("recording frames to {}", dir.display());
            self.directory = Some(dir);
        }
        self.directory
            .as_deref()
            .ok_or_else(|| OmniError::Persistence("no output directory".into()))
    }

    fn unused_directory(&self) -> Result<PathBuf, OmniError> {
        if !self.base.exists() {
            return Ok(self.base.clone());
        }
        (1..=u32::MAX)
            .map(|n| {
                let mut name = OsString::from(self.base.as_os_str());
                name.push(n.to_string());
                PathBuf::from(name)
            })
            .find(|candidate| !candidate.exists())
            .ok_or_else(|| {
                OmniError::Persistence(format!(
                    "no free directory name for {}",
                    self.base.display()
                ))
            })
    }

    /// Write `image` as frame `frame`. Returns the written path.
    pub fn write_frame(
        &mut self,
        image: &RgbaImage,
        frame: u64,
    ) -> Result<PathBuf, OmniError> {
        let path = self.ensure_directory()?.join(frame_file_name(frame));
        image.save(&path)?;
        Ok(path)
    }
}
