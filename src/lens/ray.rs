//! Sensor-plane ↔ view-ray mapping for every lens kind.
//!
//! Sensor coordinates are millimetres from the principal point with +Y up.
//! Rays use forward = +Z, up = +Y, right = +X.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};

use super::kind::LensKind;
use super::model::DerivedConstants;

/// Ray angle θ (radians from the optical axis) that lands at radius `r` mm
/// on the sensor for a radial lens of focal length `focal_length`.
///
/// `None` for the panoramic kinds, non-positive focal lengths, and radii
/// the lens cannot reach.
#[must_use]
pub fn angle_for_radius(
    kind: LensKind,
    focal_length: f32,
    r: f32,
) -> Option<f32> {
    if focal_length <= 0.0 {
        return None;
    }
    let q = r / focal_length;
    match kind {
        LensKind::Rectilinear => Some(q.atan()),
        LensKind::Orthographic => (q <= 1.0).then(|| q.asin()),
        LensKind::Equidistant => Some(q),
        LensKind::Stereographic => Some(2.0 * (q / 2.0).atan()),
        LensKind::EquisolidAngle => {
            (q <= 2.0).then(|| 2.0 * (q / 2.0).asin())
        }
        LensKind::Equirectangular | LensKind::Cylindrical => None,
    }
}

/// Sensor radius in mm at which a ray at angle `theta` from the optical
/// axis lands. `None` where the lens formula diverges or folds back.
#[must_use]
pub fn radius_for_angle(
    kind: LensKind,
    focal_length: f32,
    theta: f32,
) -> Option<f32> {
    let f = focal_length;
    match kind {
        LensKind::Rectilinear => (theta < FRAC_PI_2).then(|| f * theta.tan()),
        LensKind::Orthographic => {
            (theta <= FRAC_PI_2).then(|| f * theta.sin())
        }
        LensKind::Equidistant => Some(f * theta),
        LensKind::Stereographic => {
            (theta < PI).then(|| 2.0 * f * (theta / 2.0).tan())
        }
        LensKind::EquisolidAngle => Some(2.0 * f * (theta / 2.0).sin()),
        LensKind::Equirectangular | LensKind::Cylindrical => None,
    }
}

/// Everything needed to map between sensor millimetres and view rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayMapping {
    /// Active lens kind.
    pub kind: LensKind,
    /// Focal length in mm (radial kinds).
    pub focal_length: f32,
    /// Image-circle radius in mm; 0.0 is unbounded.
    pub image_circle_radius: f32,
    /// Angle/millimetre constants (panoramic kinds).
    pub constants: DerivedConstants,
}

impl RayMapping {
    /// Unit view ray through sensor point `mm`.
    #[must_use]
    pub fn sensor_to_ray(&self, mm: Vec2) -> Option<Vec3> {
        let c = &self.constants;
        match self.kind {
            LensKind::Equirectangular => {
                let lon = mm.x * c.hrad_per_mm;
                let lat = mm.y * c.vrad_per_mm;
                if lat.abs() > FRAC_PI_2 + 1e-5 {
                    return None;
                }
                let lat = lat.clamp(-FRAC_PI_2, FRAC_PI_2);
                Some(Vec3::new(
                    lat.cos() * lon.sin(),
                    lat.sin(),
                    lat.cos() * lon.cos(),
                ))
            }
            LensKind::Cylindrical => {
                let lon = mm.x * c.hrad_per_mm;
                let slope = mm.y * c.v_per_mm;
                Vec3::new(lon.sin(), slope, lon.cos()).try_normalize()
            }
            kind => {
                let r = mm.length();
                if self.image_circle_radius > 0.0
                    && r > self.image_circle_radius
                {
                    return None;
                }
                if r == 0.0 {
                    return Some(Vec3::Z);
                }
                let theta = angle_for_radius(kind, self.focal_length, r)?;
                let dir = mm / r * theta.sin();
                Some(Vec3::new(dir.x, dir.y, theta.cos()))
            }
        }
    }

    /// Sensor point (mm) hit by view direction `dir`.
    #[must_use]
    pub fn ray_to_sensor(&self, dir: Vec3) -> Option<Vec2> {
        let dir = dir.try_normalize()?;
        let c = &self.constants;
        match self.kind {
            LensKind::Equirectangular => {
                let lon = dir.x.atan2(dir.z);
                let lat = dir.y.clamp(-1.0, 1.0).asin();
                Some(Vec2::new(lon * c.hmm_per_rad, lat * c.vmm_per_rad))
            }
            LensKind::Cylindrical => {
                let horizontal = dir.x.hypot(dir.z);
                if horizontal == 0.0 {
                    return None;
                }
                let lon = dir.x.atan2(dir.z);
                Some(Vec2::new(
                    lon * c.hmm_per_rad,
                    dir.y / horizontal * c.mm_per_v,
                ))
            }
            kind => {
                let theta = dir.z.clamp(-1.0, 1.0).acos();
                let r = radius_for_angle(kind, self.focal_length, theta)?;
                if self.image_circle_radius > 0.0
                    && r > self.image_circle_radius
                {
                    return None;
                }
                let across = Vec2::new(dir.x, dir.y);
                Some(across.try_normalize().map_or(Vec2::ZERO, |d| d * r))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radial(kind: LensKind) -> RayMapping {
        RayMapping {
            kind,
            focal_length: 1.0,
            image_circle_radius: 0.0,
            constants: DerivedConstants::default(),
        }
    }

    #[test]
    fn radius_and_angle_are_inverse_for_radial_kinds() {
        for kind in [
            LensKind::Rectilinear,
            LensKind::Orthographic,
            LensKind::Equidistant,
            LensKind::Stereographic,
            LensKind::EquisolidAngle,
        ] {
            for deg in [5.0_f32, 30.0, 60.0, 85.0] {
                let theta = deg.to_radians();
                let r = radius_for_angle(kind, 2.0, theta).unwrap();
                let back = angle_for_radius(kind, 2.0, r).unwrap();
                assert!((back - theta).abs() < 1e-4, "{kind} at {deg}");
            }
        }
    }

    #[test]
    fn rectilinear_cannot_reach_ninety_degrees() {
        assert!(radius_for_angle(LensKind::Rectilinear, 1.0, FRAC_PI_2)
            .is_none());
        assert!(angle_for_radius(LensKind::Orthographic, 1.0, 1.5).is_none());
    }

    #[test]
    fn equidistant_fisheye_sees_behind_the_camera() {
        let mapping = radial(LensKind::Equidistant);
        // theta = 2 rad > 90 degrees
        let ray = mapping.sensor_to_ray(Vec2::new(2.0, 0.0)).unwrap();
        assert!(ray.z < 0.0);
        assert!((ray.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn image_circle_bounds_the_mapping() {
        let mut mapping = radial(LensKind::Equidistant);
        mapping.image_circle_radius = 0.5;
        assert!(mapping.sensor_to_ray(Vec2::new(0.4, 0.0)).is_some());
        assert!(mapping.sensor_to_ray(Vec2::new(0.6, 0.0)).is_none());
    }

    #[test]
    fn equirectangular_center_and_edge() {
        let constants = DerivedConstants::new(Vec2::new(2.0, 1.0), 360.0, 180.0);
        let mapping = RayMapping {
            kind: LensKind::Equirectangular,
            focal_length: 0.0,
            image_circle_radius: 0.0,
            constants,
        };
        let ahead = mapping.sensor_to_ray(Vec2::ZERO).unwrap();
        assert!((ahead - Vec3::Z).length() < 1e-5);
        // left edge of the sensor is longitude -180: straight behind
        let behind = mapping.sensor_to_ray(Vec2::new(-1.0, 0.0)).unwrap();
        assert!((behind + Vec3::Z).length() < 1e-4);
        let up = mapping.sensor_to_ray(Vec2::new(0.0, 0.5)).unwrap();
        assert!((up - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn cylindrical_keeps_vertical_lines_vertical() {
        let constants = DerivedConstants::new(Vec2::new(2.0, 1.0), 360.0, 90.0);
        let mapping = RayMapping {
            kind: LensKind::Cylindrical,
            focal_length: 0.0,
            image_circle_radius: 0.0,
            constants,
        };
        let low = mapping.sensor_to_ray(Vec2::new(0.3, -0.2)).unwrap();
        let high = mapping.sensor_to_ray(Vec2::new(0.3, 0.4)).unwrap();
        let az = |v: Vec3| v.x.atan2(v.z);
        assert!((az(low) - az(high)).abs() < 1e-5);
        let back = mapping.ray_to_sensor(high).unwrap();
        assert!((back - Vec2::new(0.3, 0.4)).length() < 1e-4);
    }
}
