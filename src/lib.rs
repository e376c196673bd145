// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! 360° cube-map capture and lens reprojection with arcball control.
//!
//! A virtual viewpoint captures its surroundings into a six-face cube map
//! every frame. The cube map is then re-projected through one of seven lens
//! models (rectilinear, orthographic, equidistant, stereographic,
//! equisolid-angle, equirectangular, cylindrical) into a flat output image,
//! which can be recorded as a numbered PNG sequence. Dragging the pointer
//! rotates the view through an arcball; scrolling changes the field of
//! view.
//!
//! # Key entry points
//!
//! - [`projection::ProjectionManager`] - the per-frame capture/reproject
//!   loop and its lifecycle
//! - [`lens::LensModel`] - lens intrinsics and FOV ↔ focal-length math
//! - [`camera::ArcBall`] - pointer drags → orientation
//! - [`backend::RenderBackend`] - the renderer contract, with
//!   [`backend::SoftwareBackend`] as a CPU reference implementation
//! - [`options::Options`] - runtime configuration (TOML)
//!
//! # Architecture
//!
//! Everything runs on the caller's thread, one tick per rendered frame. The
//! manager owns its lens model, arcball, buffers and recording state
//! outright; a host feeds it [`input::FrameInput`] snapshots from an
//! [`input::InputProcessor`] and calls the lifecycle methods from its own
//! loop.

pub mod backend;
pub mod camera;
pub mod error;
pub mod input;
pub mod lens;
pub mod options;
pub mod projection;
pub mod util;

pub use error::OmniError;
pub use lens::{LensKind, LensModel};
pub use options::Options;
pub use projection::{FrameReport, ProjectionManager};
