use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OmniError;

/// One of the seven supported mappings between the ray angle θ from the
/// optical axis and the radial distance `r` on the image plane.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [projection]
/// lens = "stereographic"
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum LensKind {
    /// `r = f·tan θ`: pinhole lens, straight lines stay straight.
    #[default]
    Rectilinear,
    /// `r = f·sin θ`: orthographic projection of a sphere.
    Orthographic,
    /// `r = f·θ`: equidistant fisheye.
    Equidistant,
    /// `r = 2f·tan(θ/2)`: "little planet" projection.
    Stereographic,
    /// `r = 2f·sin(θ/2)`: equisolid-angle fisheye, mirror ball.
    EquisolidAngle,
    /// `u` proportional to longitude, `v` proportional to latitude.
    Equirectangular,
    /// `u` proportional to longitude, `v` proportional to tan(latitude).
    Cylindrical,
}

impl LensKind {
    /// Every kind, in tag order.
    pub const ALL: [Self; 7] = [
        Self::Rectilinear,
        Self::Orthographic,
        Self::Equidistant,
        Self::Stereographic,
        Self::EquisolidAngle,
        Self::Equirectangular,
        Self::Cylindrical,
    ];

    /// Numeric tag pushed to the rendering backend.
    #[must_use]
    pub fn tag(self) -> u32 {
        match self {
            Self::Rectilinear => 0,
            Self::Orthographic => 1,
            Self::Equidistant => 2,
            Self::Stereographic => 3,
            Self::EquisolidAngle => 4,
            Self::Equirectangular => 5,
            Self::Cylindrical => 6,
        }
    }

    /// Upper-case display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rectilinear => "RECTILINEAR",
            Self::Orthographic => "ORTHOGRAPHIC",
            Self::Equidistant => "EQUIDISTANT",
            Self::Stereographic => "STEREOGRAPHIC",
            Self::EquisolidAngle => "EQUISOLIDANGLE",
            Self::Equirectangular => "EQUIRECTANGULAR",
            Self::Cylindrical => "CYLINDRICAL",
        }
    }

    /// Whether the kind is parameterized by fov directly instead of a
    /// focal length.
    #[must_use]
    pub fn is_panoramic(self) -> bool {
        matches!(self, Self::Equirectangular | Self::Cylindrical)
    }

    /// Legal interactive field-of-view range in degrees.
    #[must_use]
    pub fn fov_range(self) -> FovRange {
        match self {
            Self::Rectilinear | Self::Cylindrical => FovRange::new(1.0, 179.0),
            Self::Equidistant => FovRange::new(1.0, 220.0),
            Self::Stereographic => FovRange::new(1.0, 359.0),
            _ => FovRange::fixed(360.0),
        }
    }

    /// The following kind in tag order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.tag() as usize + 1) % Self::ALL.len()]
    }

    /// The preceding kind in tag order, wrapping around.
    #[must_use]
    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.tag() as usize + len - 1) % len]
    }
}

impl TryFrom<u32> for LensKind {
    type Error = OmniError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or(OmniError::UnknownLensKind(tag))
    }
}

impl fmt::Display for LensKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where pixel `(0, 0)` sits in the image.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ImageOrigin {
    /// Row 0 is the top row; image y grows downward.
    #[default]
    TopLeft,
    /// Row 0 is the bottom row; image y grows upward.
    BottomLeft,
}

impl ImageOrigin {
    /// Sign that turns an image-space y offset into an up-positive one.
    #[must_use]
    pub fn y_sign(self) -> f32 {
        match self {
            Self::TopLeft => -1.0,
            Self::BottomLeft => 1.0,
        }
    }
}

impl TryFrom<u32> for ImageOrigin {
    type Error = OmniError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::TopLeft),
            1 => Ok(Self::BottomLeft),
            other => Err(OmniError::UnknownImageOrigin(other)),
        }
    }
}

/// Closed interval of legal field-of-view values, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FovRange {
    /// Smallest legal value.
    pub min: f32,
    /// Largest legal value.
    pub max: f32,
}

impl FovRange {
    /// Range `[min, max]`.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate range pinned to a single value.
    #[must_use]
    pub fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Whether the range allows no adjustment at all.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Clamp `fov` into the range.
    #[must_use]
    pub fn clamp(&self, fov: f32) -> f32 {
        fov.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_try_from() {
        for kind in LensKind::ALL {
            assert_eq!(LensKind::try_from(kind.tag()).unwrap(), kind);
        }
    }

    #[test]
    fn out_of_range_tags_are_configuration_errors() {
        assert!(matches!(
            LensKind::try_from(7),
            Err(OmniError::UnknownLensKind(7))
        ));
        assert!(matches!(
            ImageOrigin::try_from(2),
            Err(OmniError::UnknownImageOrigin(2))
        ));
    }

    #[test]
    fn fov_ranges_per_kind() {
        assert_eq!(LensKind::Rectilinear.fov_range(), FovRange::new(1.0, 179.0));
        assert_eq!(LensKind::Equidistant.fov_range().max, 220.0);
        assert_eq!(LensKind::Stereographic.fov_range().max, 359.0);
        assert_eq!(LensKind::Cylindrical.fov_range().max, 179.0);
        assert!(LensKind::Equirectangular.fov_range().is_fixed());
        assert!(LensKind::Orthographic.fov_range().is_fixed());
        assert!(LensKind::EquisolidAngle.fov_range().is_fixed());
    }

    #[test]
    fn cycling_wraps_both_ways() {
        assert_eq!(LensKind::Cylindrical.next(), LensKind::Rectilinear);
        assert_eq!(LensKind::Rectilinear.previous(), LensKind::Cylindrical);
        assert_eq!(LensKind::Equidistant.next(), LensKind::Stereographic);
    }

    #[test]
    fn serde_names_are_snake_case() {
        let json = serde_json::to_string(&LensKind::EquisolidAngle).unwrap();
        assert_eq!(json, "\"equisolid_angle\"");
    }
}
