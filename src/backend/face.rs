//! Cube faces and the face-selection mask.
//!
//! Face orientation follows the usual cube-map convention: face-local
//! `s` runs right and `t` runs down across each face, both in `[-1, 1]`.

use glam::{Vec2, Vec3};

/// One of the six faces of a cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// Looking along +X.
    PositiveX,
    /// Looking along −X.
    NegativeX,
    /// Looking along +Y.
    PositiveY,
    /// Looking along −Y.
    NegativeY,
    /// Looking along +Z.
    PositiveZ,
    /// Looking along −Z.
    NegativeZ,
}

impl CubeFace {
    /// All faces in layer order.
    pub const ALL: [Self; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    /// Layer index of the face (0..6).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::PositiveX => 0,
            Self::NegativeX => 1,
            Self::PositiveY => 2,
            Self::NegativeY => 3,
            Self::PositiveZ => 4,
            Self::NegativeZ => 5,
        }
    }

    /// Unnormalized direction through face-local coordinates `(s, t)`.
    #[must_use]
    pub fn direction(self, s: f32, t: f32) -> Vec3 {
        match self {
            Self::PositiveX => Vec3::new(1.0, -t, -s),
            Self::NegativeX => Vec3::new(-1.0, -t, s),
            Self::PositiveY => Vec3::new(s, 1.0, t),
            Self::NegativeY => Vec3::new(s, -1.0, -t),
            Self::PositiveZ => Vec3::new(s, -t, 1.0),
            Self::NegativeZ => Vec3::new(-s, -t, -1.0),
        }
    }

    /// Face hit by `dir` and the face-local `(s, t)` of the hit.
    ///
    /// `None` for the zero vector.
    #[must_use]
    pub fn from_direction(dir: Vec3) -> Option<(Self, Vec2)> {
        let abs = dir.abs();
        let (face, sc, tc, major) = if abs.x >= abs.y && abs.x >= abs.z {
            if dir.x >= 0.0 {
                (Self::PositiveX, -dir.z, -dir.y, abs.x)
            } else {
                (Self::NegativeX, dir.z, -dir.y, abs.x)
            }
        } else if abs.y >= abs.z {
            if dir.y >= 0.0 {
                (Self::PositiveY, dir.x, dir.z, abs.y)
            } else {
                (Self::NegativeY, dir.x, -dir.z, abs.y)
            }
        } else if dir.z >= 0.0 {
            (Self::PositiveZ, dir.x, -dir.y, abs.z)
        } else {
            (Self::NegativeZ, -dir.x, -dir.y, abs.z)
        };
        if major == 0.0 {
            return None;
        }
        Some((face, Vec2::new(sc, tc) / major))
    }
}

/// Bit set of cube faces to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    /// No faces.
    pub const NONE: Self = Self(0);
    /// All six faces (`63`).
    pub const ALL: Self = Self(0b11_1111);

    /// Mask from raw bits; bits above the sixth are dropped.
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits.
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether `face` is selected.
    #[must_use]
    pub fn contains(self, face: CubeFace) -> bool {
        self.0 & (1 << face.index()) != 0
    }

    /// Selected faces in layer order.
    pub fn faces(self) -> impl Iterator<Item = CubeFace> {
        CubeFace::ALL.into_iter().filter(move |&f| self.contains(f))
    }
}

impl Default for FaceMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<CubeFace> for FaceMask {
    fn from(face: CubeFace) -> Self {
        Self(1 << face.index())
    }
}
