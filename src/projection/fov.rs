use crate::lens::{LensKind, LensModel};

/// Field of view every lens switch starts from, in degrees.
pub const DEFAULT_FOV: f32 = 90.0;

/// Interactive field-of-view state.
///
/// The value is always inside the active lens kind's
/// [`fov_range`](LensKind::fov_range); out-of-range requests are clamped,
/// never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovControl {
    fov: f32,
    sensitivity: f32,
}

impl FovControl {
    /// Control at [`DEFAULT_FOV`] clamped for `kind`, moving `sensitivity`
    /// degrees per scroll unit.
    #[must_use]
    pub fn new(kind: LensKind, sensitivity: f32) -> Self {
        Self {
            fov: kind.fov_range().clamp(DEFAULT_FOV),
            sensitivity,
        }
    }

    /// Current field of view in degrees.
    #[must_use]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Degrees per scroll unit.
    #[must_use]
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Change the degrees per scroll unit.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    /// Set the field of view, clamped for `kind`. Returns the stored value.
    pub fn set(&mut self, fov: f32, kind: LensKind) -> f32 {
        self.fov = kind.fov_range().clamp(fov);
        self.fov
    }

    /// Apply a scroll delta (positive zooms in). Returns `false` when there
    /// was nothing to apply.
    pub fn scroll(&mut self, delta: f32, kind: LensKind) -> bool {
        if delta == 0.0 {
            return false;
        }
        let _ = self.set(self.fov - delta * self.sensitivity, kind);
        true
    }
}

/// Make `lens` image `fov` degrees with its active kind.
///
/// Radial kinds get the matching focal length along the longer image axis;
/// the cylindrical kind takes `fov` as its vertical extent. The
/// equirectangular kind always covers the full sphere, whatever an earlier
/// kind left behind.
pub fn apply_fov(lens: &mut LensModel, fov: f32) {
    match lens.kind() {
        LensKind::Equirectangular => lens.reset_panorama(),
        LensKind::Cylindrical => lens.set_fov(360.0, fov),
        _ => {
            let fl = lens.fov_to_fl(fov);
            lens.set_intrinsic(
                fl,
                lens.aspect(),
                lens.skew(),
                lens.principal_point(),
            );
        }
    }
}
