//! Contract between the projection manager and whatever renders the scene.
//!
//! A backend owns two kinds of image buffers (a six-face cube map and a
//! `2N × N` output image), renders the scene into the cube map from a
//! capture camera, and reprojects the cube map into the output through the
//! parameters of the last pushed [`ProjectionUniform`].
//!
//! [`SoftwareBackend`] is a CPU reference implementation used headless and
//! in tests.

/// Cube faces and the face-selection mask.
pub mod face;
/// CPU reference backend.
pub mod software;
/// Reprojection parameter block.
pub mod uniform;

pub use face::{CubeFace, FaceMask};
use image::RgbaImage;
pub use software::{
    Environment, SoftwareBackend, SoftwareCubemap, SoftwareOutput,
    SyntheticSky,
};
pub use uniform::ProjectionUniform;

use crate::camera::CaptureCamera;
use crate::error::OmniError;

/// Rendering backend consumed by
/// [`ProjectionManager`](crate::projection::ProjectionManager).
pub trait RenderBackend {
    /// Six-face cube-map buffer.
    type Cubemap;
    /// Reprojected output buffer.
    type Output;

    /// Allocate a cube map with `size × size` faces.
    fn create_cubemap(&mut self, size: u32) -> Result<Self::Cubemap, OmniError>;

    /// Allocate a `width × height` output image.
    fn create_output(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Self::Output, OmniError>;

    /// Render the faces selected by `mask` from `camera` into `cubemap`.
    fn render_cubemap(
        &mut self,
        camera: &CaptureCamera,
        mask: FaceMask,
        cubemap: &mut Self::Cubemap,
    );

    /// Replace the reprojection parameters.
    fn set_projection(&mut self, uniform: &ProjectionUniform);

    /// Reproject `cubemap` into `output` with the current parameters.
    fn blit_projection(
        &mut self,
        cubemap: &Self::Cubemap,
        output: &mut Self::Output,
    );

    /// Copy `output` back to host memory.
    fn read_pixels(&mut self, output: &Self::Output)
        -> Result<RgbaImage, OmniError>;
}
