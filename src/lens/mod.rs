//! Lens projection models.
//!
//! Seven kinds of lens ([`LensKind`]), the intrinsic parameters that drive
//! them ([`LensModel`]), and the mapping between sensor points and view
//! rays ([`RayMapping`]).

/// Lens kinds, image origins and per-kind fov ranges.
pub mod kind;
/// Intrinsic parameters and FOV ↔ focal-length conversion.
pub mod model;
/// Sensor ↔ ray mapping.
pub mod ray;

pub use kind::{FovRange, ImageOrigin, LensKind};
pub use model::{DerivedConstants, LensModel};
pub use ray::RayMapping;
