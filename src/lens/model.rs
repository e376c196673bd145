//! Intrinsic lens parameters and the FOV ↔ focal-length relationship.
//!
//! [`LensModel`] keeps its derived angle/millimetre constants in sync with
//! the parameters they depend on: every setter ends in [`recompute`], so
//! [`hrad_per_mm`](LensModel::hrad_per_mm) and friends never read stale
//! state.
//!
//! [`recompute`]: LensModel::recompute

use glam::{Vec2, Vec3};

use super::kind::{ImageOrigin, LensKind};
use super::ray::{angle_for_radius, RayMapping};
use crate::error::OmniError;

/// Millimetres per pixel-pitch unit.
const PITCH_TO_MM: f32 = 1e-3;

/// Constants for the equirectangular/cylindrical ray mapping, derived from
/// the field of view and the sensor extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedConstants {
    /// Horizontal radians per sensor millimetre.
    pub hrad_per_mm: f32,
    /// Vertical radians per sensor millimetre.
    pub vrad_per_mm: f32,
    /// Horizontal sensor millimetres per radian.
    pub hmm_per_rad: f32,
    /// Vertical sensor millimetres per radian.
    pub vmm_per_rad: f32,
    /// Vertical slope (tan of latitude) per sensor millimetre.
    pub v_per_mm: f32,
    /// Sensor millimetres per unit of vertical slope.
    pub mm_per_v: f32,
}

impl DerivedConstants {
    /// Derive the constants for a sensor of `sensor_mm` extent covering
    /// `hfov` × `vfov` degrees. Zero extents or angles give zero constants.
    #[must_use]
    pub fn new(sensor_mm: Vec2, hfov: f32, vfov: f32) -> Self {
        let hrad = hfov.to_radians();
        let vrad = vfov.to_radians();
        let slope = 2.0 * (vrad * 0.5).tan();
        Self {
            hrad_per_mm: ratio(hrad, sensor_mm.x),
            vrad_per_mm: ratio(vrad, sensor_mm.y),
            hmm_per_rad: ratio(sensor_mm.x, hrad),
            vmm_per_rad: ratio(sensor_mm.y, vrad),
            v_per_mm: ratio(slope, sensor_mm.y),
            mm_per_v: ratio(sensor_mm.y, slope),
        }
    }
}

fn ratio(num: f32, den: f32) -> f32 {
    if den == 0.0 || !den.is_finite() {
        0.0
    } else {
        num / den
    }
}

/// Intrinsic camera parameters for one of the seven [`LensKind`]s.
///
/// Holds the image geometry (size in pixels, pixel pitch, origin), the
/// parameters of the lens formula (focal length, fov, principal point, skew,
/// aspect) and an optional image circle.
#[derive(Debug, Clone, PartialEq)]
pub struct LensModel {
    image_width: u32,
    image_height: u32,
    pixel_width: f32,
    pixel_height: f32,
    image_origin: ImageOrigin,
    kind: LensKind,
    /// Radius in sensor mm of the usable image around the principal point.
    /// 0.0 means unbounded.
    image_circle_radius: f32,
    /// Focal length in mm; meaning depends on `kind`. Unused by the
    /// panoramic kinds, which use `hfov`/`vfov` instead.
    focal_length: f32,
    hfov: f32,
    vfov: f32,
    principal_point: Vec2,
    /// Effective skew, counter-clockwise, in degrees.
    skew: f32,
    aspect: f32,
    derived: DerivedConstants,
}

impl Default for LensModel {
    fn default() -> Self {
        let mut model = Self {
            image_width: 0,
            image_height: 0,
            pixel_width: 0.0,
            pixel_height: 0.0,
            image_origin: ImageOrigin::TopLeft,
            kind: LensKind::Rectilinear,
            image_circle_radius: 0.0,
            focal_length: 0.0,
            hfov: 360.0,
            vfov: 180.0,
            principal_point: Vec2::ZERO,
            skew: 0.0,
            aspect: 0.0,
            derived: DerivedConstants::default(),
        };
        model.recompute();
        model
    }
}

impl LensModel {
    /// Create a model of `kind` for a `width` × `height` image with the
    /// given pixel pitch. See [`init`](Self::init).
    #[must_use]
    pub fn new(
        kind: LensKind,
        width: u32,
        height: u32,
        pixel_width: f32,
        pixel_height: f32,
    ) -> Self {
        let mut model = Self::default();
        model.init(kind, width, height, pixel_width, pixel_height);
        model
    }

    /// Set the geometry and re-derive every dependent field.
    ///
    /// The principal point moves to the image center, the origin resets to
    /// top-left, and the focal length gives a 90° horizontal view through a
    /// rectilinear lens. `hfov` is 360 and `vfov` follows from the physical
    /// aspect, clamped to 180. Safe to call again on resize.
    pub fn init(
        &mut self,
        kind: LensKind,
        width: u32,
        height: u32,
        pixel_width: f32,
        pixel_height: f32,
    ) {
        self.image_width = width;
        self.image_height = height;
        self.pixel_width = pixel_width;
        self.pixel_height = pixel_height;
        self.image_origin = ImageOrigin::TopLeft;
        self.kind = kind;
        self.aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        self.reset_intrinsics();
    }

    /// Zero the geometry and reset to an unbounded rectilinear lens.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recompute the intrinsic parameters from the current geometry,
    /// leaving the geometry itself alone.
    pub fn defaults(&mut self) {
        self.aspect = if self.pixel_height > 0.0 {
            self.pixel_width / self.pixel_height
        } else {
            1.0
        };
        self.reset_intrinsics();
    }

    fn reset_intrinsics(&mut self) {
        self.principal_point = Vec2::new(
            self.image_width as f32 * 0.5,
            self.image_height as f32 * 0.5,
        );
        self.skew = 0.0;
        // 90 degrees horizontal field of view with a rectilinear lens
        self.focal_length =
            0.5 * self.image_width as f32 * self.pixel_width * PITCH_TO_MM;
        self.reset_panorama();
    }

    /// Restore the panoramic fields of view from the current geometry:
    /// `hfov` 360 and `vfov` from the physical aspect, clamped to 180.
    pub fn reset_panorama(&mut self) {
        self.hfov = 360.0;
        let sensor = self.sensor_size_mm();
        self.vfov = if sensor.x > 0.0 {
            (self.hfov * sensor.y / sensor.x).min(180.0)
        } else {
            0.0
        };
        self.recompute();
    }

    /// Bulk setter for the parameters of the projection matrix. Callers
    /// pre-clamp; nothing is validated here.
    pub fn set_intrinsic(
        &mut self,
        focal_length: f32,
        aspect: f32,
        skew: f32,
        principal_point: Vec2,
    ) {
        self.focal_length = focal_length;
        self.aspect = aspect;
        self.skew = skew;
        self.principal_point = principal_point;
        self.recompute();
    }

    /// Switch the active lens kind. Focal length and fov are left as they
    /// are; callers recompute whatever depends on the kind.
    pub fn set_projection(&mut self, kind: LensKind) {
        self.kind = kind;
        self.recompute();
    }

    /// Switch the active lens kind by numeric tag. Unknown tags are logged
    /// and leave the current kind in place.
    pub fn set_projection_tag(&mut self, tag: u32) -> Result<(), OmniError> {
        let kind = LensKind::try_from(tag).inspect_err(|e| {
            log::error!("set_projection_tag(): {e}");
        })?;
        self.set_projection(kind);
        Ok(())
    }

    /// Set the image origin convention.
    pub fn set_image_origin(&mut self, origin: ImageOrigin) {
        self.image_origin = origin;
        self.recompute();
    }

    /// Set the image origin by numeric tag. Unknown tags are logged and
    /// leave the current origin in place.
    pub fn set_image_origin_tag(&mut self, tag: u32) -> Result<(), OmniError> {
        let origin = ImageOrigin::try_from(tag).inspect_err(|e| {
            log::error!("set_image_origin_tag(): {e}");
        })?;
        self.set_image_origin(origin);
        Ok(())
    }

    /// Update the image size. Intrinsic parameters are not recomputed; call
    /// [`defaults`](Self::defaults) for that.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
        self.recompute();
    }

    /// Set the fields of view used by the panoramic kinds. `vfov` is clamped
    /// to 180.
    pub fn set_fov(&mut self, hfov: f32, vfov: f32) {
        self.hfov = hfov;
        self.vfov = vfov.min(180.0);
        self.recompute();
    }

    /// Set the image-circle radius in sensor mm (0.0 = unbounded).
    pub fn set_image_circle_radius(&mut self, radius: f32) {
        self.image_circle_radius = radius.max(0.0);
    }

    /// Re-derive the angle/millimetre constants. Every setter calls this;
    /// it is public for callers that want to be explicit about it.
    pub fn recompute(&mut self) {
        if self.hfov == 0.0 {
            self.hfov = 360.0;
        }
        if self.vfov == 0.0 {
            self.vfov = 180.0;
        }
        self.derived =
            DerivedConstants::new(self.sensor_size_mm(), self.hfov, self.vfov);
    }

    /// Focal length (mm) that yields a horizontal field of view of `hfov`
    /// degrees with the active kind.
    #[must_use]
    pub fn hfov_to_fl(&self, hfov: f32) -> f32 {
        let r = 0.5 * self.sensor_size_mm().x;
        rt_to_fl(self.kind, r, 0.5 * hfov.to_radians())
    }

    /// Focal length (mm) that yields a vertical field of view of `vfov`
    /// degrees with the active kind.
    #[must_use]
    pub fn vfov_to_fl(&self, vfov: f32) -> f32 {
        let r = 0.5 * self.sensor_size_mm().y;
        rt_to_fl(self.kind, r, 0.5 * vfov.to_radians())
    }

    /// Focal length for `fov` degrees along the longer physical image axis
    /// (horizontal for wide or square-by-width images, vertical otherwise).
    #[must_use]
    pub fn fov_to_fl(&self, fov: f32) -> f32 {
        if self.is_wide() {
            self.hfov_to_fl(fov)
        } else {
            self.vfov_to_fl(fov)
        }
    }

    /// Horizontal field of view (degrees) produced by `focal_length`.
    /// Returns 0.0 for the panoramic kinds or an unreachable radius.
    #[must_use]
    pub fn fl_to_hfov(&self, focal_length: f32) -> f32 {
        let r = 0.5 * self.sensor_size_mm().x;
        angle_for_radius(self.kind, focal_length, r)
            .map_or(0.0, |t| 2.0 * t.to_degrees())
    }

    /// Vertical field of view (degrees) produced by `focal_length`.
    #[must_use]
    pub fn fl_to_vfov(&self, focal_length: f32) -> f32 {
        let r = 0.5 * self.sensor_size_mm().y;
        angle_for_radius(self.kind, focal_length, r)
            .map_or(0.0, |t| 2.0 * t.to_degrees())
    }

    /// Inverse of [`fov_to_fl`](Self::fov_to_fl).
    #[must_use]
    pub fn fl_to_fov(&self, focal_length: f32) -> f32 {
        if self.is_wide() {
            self.fl_to_hfov(focal_length)
        } else {
            self.fl_to_vfov(focal_length)
        }
    }

    fn is_wide(&self) -> bool {
        let sensor = self.sensor_size_mm();
        sensor.x >= sensor.y
    }

    /// Physical sensor extent in mm.
    #[must_use]
    pub fn sensor_size_mm(&self) -> Vec2 {
        Vec2::new(
            self.image_width as f32 * self.pixel_width * PITCH_TO_MM,
            self.image_height as f32 * self.pixel_height * PITCH_TO_MM,
        )
    }

    /// Horizontal radians per sensor mm (equirectangular/cylindrical).
    #[must_use]
    pub fn hrad_per_mm(&self) -> f32 {
        self.derived.hrad_per_mm
    }

    /// Vertical slope per sensor mm (cylindrical).
    #[must_use]
    pub fn v_per_mm(&self) -> f32 {
        self.derived.v_per_mm
    }

    /// All derived constants.
    #[must_use]
    pub fn derived(&self) -> DerivedConstants {
        self.derived
    }

    /// Snapshot of what the ray mapping needs from this model.
    #[must_use]
    pub fn ray_mapping(&self) -> RayMapping {
        RayMapping {
            kind: self.kind,
            focal_length: self.focal_length,
            image_circle_radius: self.image_circle_radius,
            constants: self.derived,
        }
    }

    /// View ray through image pixel `pixel`, forward = +Z, up = +Y.
    /// `None` outside the image circle or the kind's angular domain.
    #[must_use]
    pub fn to_ray(&self, pixel: Vec2) -> Option<Vec3> {
        let mm = self.pixel_to_mm(pixel)?;
        self.ray_mapping().sensor_to_ray(mm)
    }

    /// Image pixel hit by view direction `dir`, if the lens can image it.
    #[must_use]
    pub fn from_ray(&self, dir: Vec3) -> Option<Vec2> {
        let mm = self.ray_mapping().ray_to_sensor(dir)?;
        self.mm_to_pixel(mm)
    }

    fn pixel_to_mm(&self, pixel: Vec2) -> Option<Vec2> {
        if self.pixel_width == 0.0 || self.pixel_height == 0.0 {
            return None;
        }
        let offset = pixel - self.principal_point;
        Some(Vec2::new(
            offset.x * self.pixel_width * PITCH_TO_MM,
            offset.y
                * self.pixel_height
                * PITCH_TO_MM
                * self.image_origin.y_sign(),
        ))
    }

    fn mm_to_pixel(&self, mm: Vec2) -> Option<Vec2> {
        if self.pixel_width == 0.0 || self.pixel_height == 0.0 {
            return None;
        }
        let offset = Vec2::new(
            mm.x / (self.pixel_width * PITCH_TO_MM),
            mm.y / (self.pixel_height * PITCH_TO_MM)
                * self.image_origin.y_sign(),
        );
        Some(self.principal_point + offset)
    }

    /// Active lens kind.
    #[must_use]
    pub fn kind(&self) -> LensKind {
        self.kind
    }

    /// Image size in pixels.
    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Pixel pitch (width, height).
    #[must_use]
    pub fn pixel_pitch(&self) -> Vec2 {
        Vec2::new(self.pixel_width, self.pixel_height)
    }

    /// Image origin convention.
    #[must_use]
    pub fn image_origin(&self) -> ImageOrigin {
        self.image_origin
    }

    /// Image-circle radius in sensor mm (0.0 = unbounded).
    #[must_use]
    pub fn image_circle_radius(&self) -> f32 {
        self.image_circle_radius
    }

    /// Focal length in mm.
    #[must_use]
    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    /// Horizontal field of view in degrees.
    #[must_use]
    pub fn hfov(&self) -> f32 {
        self.hfov
    }

    /// Vertical field of view in degrees.
    #[must_use]
    pub fn vfov(&self) -> f32 {
        self.vfov
    }

    /// Principal point in pixel coordinates.
    #[must_use]
    pub fn principal_point(&self) -> Vec2 {
        self.principal_point
    }

    /// Skew angle in degrees.
    #[must_use]
    pub fn skew(&self) -> f32 {
        self.skew
    }

    /// Effective aspect ratio.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

/// Focal length (mm) for sensor half-extent `r` (mm) seen at half-angle
/// `t` (radians).
///
/// ORTHOGRAPHIC and EQUISOLIDANGLE return a fixed 1.0 rather than
/// `r / sin t` and `r / (2·sin(t/2))`, kept for parity with the lens
/// tables this model was ported from.
fn rt_to_fl(kind: LensKind, r: f32, t: f32) -> f32 {
    match kind {
        LensKind::Rectilinear => r / t.tan(),
        LensKind::Equidistant => r / t,
        LensKind::Stereographic => r / (2.0 * (t / 2.0).tan()),
        LensKind::Orthographic | LensKind::EquisolidAngle => 1.0,
        LensKind::Equirectangular | LensKind::Cylindrical => 0.0,
    }
}
