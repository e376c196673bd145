use glam::{Mat4, Vec2};

use crate::lens::{DerivedConstants, LensKind, LensModel, RayMapping};

/// Everything the reprojection pass needs from the active lens, pushed as a
/// single struct whenever the lens or orientation changes.
///
/// Replaces per-kind feature toggles: the active kind is a tag and every
/// kind-specific parameter travels alongside it, so a reader never sees a
/// kind that disagrees with its parameters.
///
/// Layout (112 bytes, a multiple of 16; every field is 4-byte aligned):
///   rotation: mat4x4<f32>        (offset 0)
///   lens_kind: u32               (offset 64)
///   focal_length: f32            (offset 68)
///   fov: f32                     (offset 72)
///   image_circle_radius: f32     (offset 76)
///   hrad_per_mm: f32             (offset 80)
///   vrad_per_mm: f32             (offset 84)
///   hmm_per_rad: f32             (offset 88)
///   vmm_per_rad: f32             (offset 92)
///   v_per_mm: f32                (offset 96)
///   mm_per_v: f32                (offset 100)
///   sensor_mm: vec2<f32>         (offset 104)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ProjectionUniform {
    /// Rotation-only transform of the capture orientation (column-major).
    pub rotation: [[f32; 4]; 4],
    /// [`LensKind::tag`] of the active kind.
    pub lens_kind: u32,
    /// Focal length in mm (radial kinds).
    pub focal_length: f32,
    /// Interactive field of view in degrees.
    pub fov: f32,
    /// Image-circle radius in mm; 0.0 is unbounded.
    pub image_circle_radius: f32,
    /// Horizontal radians per mm.
    pub hrad_per_mm: f32,
    /// Vertical radians per mm.
    pub vrad_per_mm: f32,
    /// Horizontal mm per radian.
    pub hmm_per_rad: f32,
    /// Vertical mm per radian.
    pub vmm_per_rad: f32,
    /// Cylindrical vertical slope per mm.
    pub v_per_mm: f32,
    /// Cylindrical mm per unit of vertical slope.
    pub mm_per_v: f32,
    /// Sensor extent in mm.
    pub sensor_mm: [f32; 2],
}

impl ProjectionUniform {
    /// Snapshot `lens` with the given orientation and field of view.
    #[must_use]
    pub fn new(lens: &LensModel, rotation: Mat4, fov: f32) -> Self {
        let c = lens.derived();
        Self {
            rotation: rotation.to_cols_array_2d(),
            lens_kind: lens.kind().tag(),
            focal_length: lens.focal_length(),
            fov,
            image_circle_radius: lens.image_circle_radius(),
            hrad_per_mm: c.hrad_per_mm,
            vrad_per_mm: c.vrad_per_mm,
            hmm_per_rad: c.hmm_per_rad,
            vmm_per_rad: c.vmm_per_rad,
            v_per_mm: c.v_per_mm,
            mm_per_v: c.mm_per_v,
            sensor_mm: lens.sensor_size_mm().to_array(),
        }
    }

    /// Replace the orientation, keeping the lens parameters.
    pub fn set_rotation(&mut self, rotation: Mat4) {
        self.rotation = rotation.to_cols_array_2d();
    }

    /// Orientation as a matrix.
    #[must_use]
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.rotation)
    }

    /// Sensor extent in mm.
    #[must_use]
    pub fn sensor_size_mm(&self) -> Vec2 {
        Vec2::from_array(self.sensor_mm)
    }

    /// Ray mapping described by the uniform.
    ///
    /// An unknown lens tag is logged and yields `None`; the caller skips the
    /// pass.
    #[must_use]
    pub fn ray_mapping(&self) -> Option<RayMapping> {
        let kind = LensKind::try_from(self.lens_kind)
            .inspect_err(|e| log::error!("projection uniform: {e}"))
            .ok()?;
        Some(RayMapping {
            kind,
            focal_length: self.focal_length,
            image_circle_radius: self.image_circle_radius,
            constants: DerivedConstants {
                hrad_per_mm: self.hrad_per_mm,
                vrad_per_mm: self.vrad_per_mm,
                hmm_per_rad: self.hmm_per_rad,
                vmm_per_rad: self.vmm_per_rad,
                v_per_mm: self.v_per_mm,
                mm_per_v: self.mm_per_v,
            },
        })
    }
}
