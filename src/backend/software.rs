//! CPU reference backend.
//!
//! Renders an [`Environment`] (a function of eye position and view
//! direction) into six cube faces, then reprojects them pixel by pixel the
//! way a fragment shader would: output pixel → sensor mm → lens ray →
//! orientation → nearest cube texel.

use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};

use super::face::{CubeFace, FaceMask};
use super::uniform::ProjectionUniform;
use super::RenderBackend;
use crate::camera::CaptureCamera;
use crate::error::OmniError;

/// Something the software backend can render: the color seen from `origin`
/// looking along the unit vector `dir`.
pub trait Environment {
    /// Color seen along `dir`.
    fn radiance(&self, origin: Vec3, dir: Vec3) -> Rgba<u8>;
}

impl<F> Environment for F
where
    F: Fn(Vec3, Vec3) -> Rgba<u8>,
{
    fn radiance(&self, origin: Vec3, dir: Vec3) -> Rgba<u8> {
        self(origin, dir)
    }
}

/// Procedural test scene: a gradient sky with a latitude/longitude grid and
/// a sun, over a checkered ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSky {
    /// Direction towards the sun (normalized on use).
    pub sun_direction: Vec3,
    /// Spacing of the sky grid in degrees; 0 disables it.
    pub grid_spacing: f32,
    /// World-space height of the ground plane.
    pub ground_height: f32,
}

impl Default for SyntheticSky {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(0.3, 0.6, 0.75),
            grid_spacing: 15.0,
            ground_height: -1.7,
        }
    }
}

const HORIZON: Vec3 = Vec3::new(0.85, 0.9, 1.0);
const ZENITH: Vec3 = Vec3::new(0.2, 0.4, 0.85);
const GROUND: Vec3 = Vec3::new(0.45, 0.38, 0.3);
const SUN: Vec3 = Vec3::new(1.0, 0.95, 0.8);

impl SyntheticSky {
    fn sky(&self, dir: Vec3) -> Vec3 {
        let sun = self.sun_direction.normalize_or_zero();
        if dir.dot(sun) > 0.9995 {
            return SUN;
        }
        let mut color = HORIZON.lerp(ZENITH, dir.y.max(0.0));
        if self.grid_spacing > 0.0 {
            let lon = dir.x.atan2(dir.z).to_degrees();
            let lat = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
            let off = |deg: f32| {
                let cell = deg / self.grid_spacing;
                (cell - cell.round()).abs() * self.grid_spacing
            };
            if off(lon) < 0.4 || off(lat) < 0.4 {
                color *= 0.8;
            }
        }
        color
    }

    fn ground(&self, origin: Vec3, dir: Vec3) -> Option<Vec3> {
        if dir.y >= 0.0 || origin.y <= self.ground_height {
            return None;
        }
        let t = (origin.y - self.ground_height) / -dir.y;
        let hit = origin + dir * t;
        let parity = (hit.x.floor() as i64 + hit.z.floor() as i64).rem_euclid(2);
        let shade = if parity == 0 { 1.0 } else { 0.6 };
        let fog = (-t * 0.02).exp();
        Some(HORIZON.lerp(GROUND * shade, fog))
    }
}

impl Environment for SyntheticSky {
    fn radiance(&self, origin: Vec3, dir: Vec3) -> Rgba<u8> {
        let Some(dir) = dir.try_normalize() else {
            return Rgba([0, 0, 0, 255]);
        };
        let color = self.ground(origin, dir).unwrap_or_else(|| self.sky(dir));
        to_rgba(color)
    }
}

fn to_rgba(color: Vec3) -> Rgba<u8> {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Rgba([c.x as u8, c.y as u8, c.z as u8, 255])
}

/// Six square faces in [`CubeFace`] layer order.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareCubemap {
    size: u32,
    faces: Vec<RgbaImage>,
}

impl SoftwareCubemap {
    fn new(size: u32) -> Self {
        Self {
            size,
            faces: (0..CubeFace::ALL.len())
                .map(|_| RgbaImage::new(size, size))
                .collect(),
        }
    }

    /// Edge length of each face in pixels.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Pixels of one face.
    #[must_use]
    pub fn face(&self, face: CubeFace) -> &RgbaImage {
        &self.faces[face.index()]
    }

    /// Nearest texel seen along `dir`.
    #[must_use]
    pub fn sample(&self, dir: Vec3) -> Option<Rgba<u8>> {
        let (face, st) = CubeFace::from_direction(dir)?;
        let texel = ((st + Vec2::ONE) * 0.5 * self.size as f32).floor();
        let max = self.size.saturating_sub(1);
        let x = (texel.x.max(0.0) as u32).min(max);
        let y = (texel.y.max(0.0) as u32).min(max);
        Some(*self.faces[face.index()].get_pixel(x, y))
    }
}

/// Reprojected output image.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareOutput(RgbaImage);

impl SoftwareOutput {
    /// Output pixels.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

/// CPU implementation of [`RenderBackend`] over an [`Environment`].
#[derive(Debug, Clone)]
pub struct SoftwareBackend<E = SyntheticSky> {
    environment: E,
    uniform: Option<ProjectionUniform>,
    /// Background of the last capture camera.
    clear_color: Rgba<u8>,
}

impl<E: Environment> SoftwareBackend<E> {
    /// Backend rendering `environment`.
    #[must_use]
    pub fn new(environment: E) -> Self {
        Self {
            environment,
            uniform: None,
            clear_color: Rgba([0, 0, 0, 255]),
        }
    }

    /// Parameters of the last [`set_projection`](RenderBackend::set_projection).
    #[must_use]
    pub fn uniform(&self) -> Option<&ProjectionUniform> {
        self.uniform.as_ref()
    }

    /// The rendered scene.
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.environment
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new(SyntheticSky::default())
    }
}

impl<E: Environment> RenderBackend for SoftwareBackend<E> {
    type Cubemap = SoftwareCubemap;
    type Output = SoftwareOutput;

    fn create_cubemap(&mut self, size: u32) -> Result<SoftwareCubemap, OmniError> {
        if size == 0 {
            return Err(OmniError::Backend(
                "cube map faces must be at least 1 pixel".into(),
            ));
        }
        log::debug!("software cube map {size}x{size}x6");
        Ok(SoftwareCubemap::new(size))
    }

    fn create_output(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<SoftwareOutput, OmniError> {
        if width == 0 || height == 0 {
            return Err(OmniError::Backend(format!(
                "invalid output size {width}x{height}"
            )));
        }
        log::debug!("software output {width}x{height}");
        Ok(SoftwareOutput(RgbaImage::new(width, height)))
    }

    fn render_cubemap(
        &mut self,
        camera: &CaptureCamera,
        mask: FaceMask,
        cubemap: &mut SoftwareCubemap,
    ) {
        self.clear_color = Rgba(camera.clear_rgba8());
        let size = cubemap.size as f32;
        for face in mask.faces() {
            let env = &self.environment;
            cubemap.faces[face.index()] =
                RgbaImage::from_fn(cubemap.size, cubemap.size, |x, y| {
                    let s = 2.0 * (x as f32 + 0.5) / size - 1.0;
                    let t = 2.0 * (y as f32 + 0.5) / size - 1.0;
                    let dir = face.direction(s, t).normalize();
                    env.radiance(camera.position, dir)
                });
        }
    }

    fn set_projection(&mut self, uniform: &ProjectionUniform) {
        self.uniform = Some(*uniform);
    }

    fn blit_projection(
        &mut self,
        cubemap: &SoftwareCubemap,
        output: &mut SoftwareOutput,
    ) {
        let Some(uniform) = self.uniform else {
            log::warn!("blit_projection before set_projection; skipped");
            return;
        };
        let Some(mapping) = uniform.ray_mapping() else {
            return;
        };
        let rotation = uniform.rotation_matrix();
        let sensor = uniform.sensor_size_mm();
        let (width, height) = output.0.dimensions();
        let clear = self.clear_color;
        for (x, y, pixel) in output.0.enumerate_pixels_mut() {
            let u = (x as f32 + 0.5) / width as f32;
            let v = (y as f32 + 0.5) / height as f32;
            let mm = Vec2::new((u - 0.5) * sensor.x, (0.5 - v) * sensor.y);
            *pixel = mapping
                .sensor_to_ray(mm)
                .map(|ray| rotation.transform_vector3(ray))
                .and_then(|dir| cubemap.sample(dir))
                .unwrap_or(clear);
        }
    }

    fn read_pixels(
        &mut self,
        output: &SoftwareOutput,
    ) -> Result<RgbaImage, OmniError> {
        Ok(output.0.clone())
    }
}
