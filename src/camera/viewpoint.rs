use glam::{Mat4, Quat, Vec3};

/// Transform of the capture viewpoint: where the cube map is taken from and
/// which way the operator is looking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// World-space position.
    pub position: Vec3,
    /// Orientation (unit quaternion).
    pub orientation: Quat,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

impl Viewpoint {
    /// Viewpoint at `position` facing `orientation`.
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Rotation-only transform of the orientation; the reprojection pass
    /// uses it to counter-rotate its sampling rays.
    #[must_use]
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::ONE,
            self.orientation,
            Vec3::ZERO,
        )
    }

    /// View direction (+Z rotated by the orientation).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}

/// Render-only camera that captures the six cube faces.
///
/// Faces are always axis-aligned; only the position follows the viewpoint.
/// The viewpoint's orientation reaches the reprojection pass through the
/// rotation matrix instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureCamera {
    /// World-space position, synced from the viewpoint every capture.
    pub position: Vec3,
    /// Background (RGBA, 0.0-1.0) for output pixels the lens does not
    /// cover.
    pub clear_color: [f32; 4],
}

impl CaptureCamera {
    /// Capture camera placed at `position` with a black background.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// [`clear_color`](Self::clear_color) quantized to 8 bits per channel.
    #[must_use]
    pub fn clear_rgba8(&self) -> [u8; 4] {
        self.clear_color
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn rotation_matrix_has_no_translation() {
        let vp = Viewpoint::new(
            Vec3::new(4.0, 5.0, 6.0),
            Quat::from_rotation_x(0.3),
        );
        let m = vp.rotation_matrix();
        assert_eq!(m.w_axis, glam::Vec4::W);
        assert!(m.abs_diff_eq(Mat4::from_quat(vp.orientation), 1e-6));
    }

    #[test]
    fn clear_color_quantizes_and_clamps() {
        let mut camera = CaptureCamera::new(Vec3::ZERO);
        assert_eq!(camera.clear_rgba8(), [0, 0, 0, 255]);
        camera.clear_color = [1.0, 0.5, -2.0, 3.0];
        assert_eq!(camera.clear_rgba8(), [255, 128, 0, 255]);
    }

    #[test]
    fn forward_follows_orientation() {
        let vp = Viewpoint::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        assert!((vp.forward() - Vec3::X).length() < 1e-6);
    }
}
