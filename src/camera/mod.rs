//! Capture viewpoint and its interactive orientation control.
//!
//! Provides the arcball that turns pointer drags into a drift-free
//! orientation, and the viewpoint/capture-camera transforms the
//! projection manager renders from.

/// Arcball rotation controller.
pub mod arcball;
/// Viewpoint transform and the render-only capture camera.
pub mod viewpoint;

pub use arcball::ArcBall;
pub use viewpoint::{CaptureCamera, Viewpoint};
