//! Per-frame capture-and-reproject loop.
//!
//! [`ProjectionManager`] is the composition root: it owns the lens model,
//! the arcball, the capture buffers, the field-of-view state, the resize
//! monitor, the frame clock and the frame sink, and drives a
//! [`RenderBackend`] once per frame.
//!
//! # Frame sequence
//!
//! 1. Input: drag → arcball → viewpoint orientation, release, reset, overlay.
//! 2. Field of view from the scroll delta, clamped per lens kind.
//! 3. Cube-map capture from the viewpoint position (all six faces).
//! 4. Orientation pushed as a rotation-only matrix.
//! 5. Reprojection into the output image, when enabled.
//! 6. Optional PNG persistence of the output.
//!
//! Steps 3–6 run in [`on_tick`](ProjectionManager::on_tick) with
//! [`CaptureTiming::BeforeScene`] and in
//! [`on_late_tick`](ProjectionManager::on_late_tick) with
//! [`CaptureTiming::AfterScene`].

/// Interactive field of view.
pub mod fov;
/// Image-sequence output.
pub mod persistence;
/// Viewport-size polling.
pub mod resize;

use std::path::{Path, PathBuf};

pub use fov::{apply_fov, FovControl, DEFAULT_FOV};
use glam::Vec2;
pub use persistence::{frame_file_name, FrameSink};
pub use resize::ResizeMonitor;
use web_time::{Duration, Instant};

use crate::backend::{FaceMask, ProjectionUniform, RenderBackend};
use crate::camera::{ArcBall, CaptureCamera, Viewpoint};
use crate::error::OmniError;
use crate::input::{FrameInput, KeyAction};
use crate::lens::{LensKind, LensModel};
use crate::options::{CaptureTiming, Options};
use crate::util::FrameClock;

/// Lens kind the model is initialized with before the configured kind is
/// selected.
const START_KIND: LensKind = LensKind::Equirectangular;

/// What happened during one call to
/// [`on_tick`](ProjectionManager::on_tick) or
/// [`on_late_tick`](ProjectionManager::on_late_tick).
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Absolute frame number.
    pub frame: u64,
    /// Seconds the host should advance its scene by this frame: the fixed
    /// recording step while persistence is on, the wall-clock step
    /// otherwise.
    pub dt: f32,
    /// Cube map rendered.
    pub captured: bool,
    /// Output image reprojected.
    pub projected: bool,
    /// Outcome of writing the frame to disk, if recording.
    pub persisted: Option<Result<PathBuf, OmniError>>,
}

/// State that exists only between `on_start` and `on_stop`.
struct Session<B: RenderBackend> {
    lens: LensModel,
    arcball: ArcBall,
    fov: FovControl,
    uniform: ProjectionUniform,
    camera: Option<CaptureCamera>,
    cubemap: Option<B::Cubemap>,
    output: Option<B::Output>,
    monitor: ResizeMonitor,
    sink: FrameSink,
}

/// Drives capture, orientation, reprojection and recording.
///
/// Hosts call the lifecycle methods from their own loop:
///
/// ```ignore
/// let mut manager = ProjectionManager::new(backend, options);
/// manager.on_start(width, height);
/// loop {
///     let input = input_processor.take_frame();
///     manager.on_tick(dt, &input);
///     // ... update the rest of the scene ...
///     manager.on_late_tick();
/// }
/// manager.on_stop();
/// ```
pub struct ProjectionManager<B: RenderBackend> {
    backend: B,
    options: Options,
    viewpoint: Viewpoint,
    clock: FrameClock,
    show_overlay: bool,
    gui_visible: bool,
    session: Option<Session<B>>,
}

impl<B: RenderBackend> ProjectionManager<B> {
    /// Manager over `backend`, configured by `options`. Nothing is
    /// allocated until [`on_start`](Self::on_start).
    #[must_use]
    pub fn new(backend: B, options: Options) -> Self {
        Self {
            backend,
            show_overlay: options.capture.show_overlay,
            options,
            viewpoint: Viewpoint::default(),
            clock: FrameClock::new(),
            gui_visible: true,
            session: None,
        }
    }

    /// Place the viewpoint before starting.
    #[must_use]
    pub fn with_viewpoint(mut self, viewpoint: Viewpoint) -> Self {
        self.viewpoint = viewpoint;
        self
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Begin a session for a `width × height` viewport.
    ///
    /// The lens starts equirectangular at the viewport size, then the
    /// configured lens kind and field of view are applied (clamped). The
    /// arcball rests at the viewpoint's current orientation.
    pub fn on_start(&mut self, width: u32, height: u32) {
        if self.session.is_some() {
            log::debug!("on_start: already running");
            return;
        }
        let pitch = self.options.projection.pixel_pitch;
        let lens = LensModel::new(START_KIND, width, height, pitch, pitch);
        let arcball = ArcBall::new(width, height, self.viewpoint.orientation);
        let sensitivity = self.options.projection.fov_sensitivity;
        let fov = FovControl::new(START_KIND, sensitivity);
        let rotation = self.viewpoint.rotation_matrix();
        let uniform = ProjectionUniform::new(&lens, rotation, fov.fov());

        let poll_secs = self.options.capture.resize_poll_secs;
        let interval =
            Duration::try_from_secs_f32(poll_secs).unwrap_or_else(|_| {
                log::warn!("invalid resize_poll_secs {poll_secs}, using 0.3");
                Duration::from_millis(300)
            });
        let monitor =
            ResizeMonitor::new(interval, (width, height), Instant::now());
        let sink = FrameSink::new(self.options.persistence.folder.clone());

        self.session = Some(Session {
            lens,
            arcball,
            fov,
            uniform,
            camera: None,
            cubemap: None,
            output: None,
            monitor,
            sink,
        });
        self.sync_frame_rate();

        let kind = self.options.projection.lens;
        let fov = self.options.projection.fov;
        self.apply_lens(kind, fov);
        log::debug!("projection started at {width}x{height}, {kind}");
    }

    /// Run one frame's input handling and field-of-view update; with
    /// [`CaptureTiming::BeforeScene`], also capture and reproject.
    pub fn on_tick(&mut self, dt: f32, input: &FrameInput) -> FrameReport {
        if self.session.is_none() {
            return FrameReport::default();
        }
        let step = self.clock.advance(dt);
        let mut report = FrameReport {
            frame: self.clock.frame(),
            dt: step,
            ..FrameReport::default()
        };

        if let Some(size) = input.viewport {
            let polled = self
                .session
                .as_mut()
                .and_then(|s| s.monitor.poll(Instant::now(), size));
            if let Some((width, height)) = polled {
                self.apply_resize(width, height);
            }
        }

        self.handle_input(input);
        self.handle_scroll(input.scroll);

        if self.options.capture.timing == CaptureTiming::BeforeScene {
            self.capture_frame(&mut report);
        }
        report
    }

    /// With [`CaptureTiming::AfterScene`], capture and reproject after the
    /// rest of the scene has updated. Does nothing otherwise.
    pub fn on_late_tick(&mut self) -> FrameReport {
        let mut report = FrameReport {
            frame: self.clock.frame(),
            dt: self.clock.delta(),
            ..FrameReport::default()
        };
        if self.session.is_some()
            && self.options.capture.timing == CaptureTiming::AfterScene
        {
            self.capture_frame(&mut report);
        }
        report
    }

    /// The host's viewport changed size.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if let Some(session) = self.session.as_mut() {
            session.monitor.set_size((width, height));
        }
        self.apply_resize(width, height);
    }

    /// End the session: cancel the resize monitor and release the buffers,
    /// the capture camera, the arcball and the lens model. Later ticks are
    /// no-ops until the next [`on_start`](Self::on_start).
    pub fn on_stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.monitor.cancel();
            log::debug!("projection stopped at frame {}", self.clock.frame());
        }
    }

    // ── Operator controls ───────────────────────────────────────────────

    /// Switch lens kind. The field of view resets to [`DEFAULT_FOV`]
    /// (clamped for the new kind) and the new parameters reach the backend
    /// as one uniform.
    pub fn select_lens(&mut self, kind: LensKind) {
        self.options.projection.lens = kind;
        if self.session.is_some() {
            self.apply_lens(kind, DEFAULT_FOV);
            log::info!("lens switched to {kind}");
        }
    }

    /// Request a field of view; clamped for the active kind.
    pub fn set_fov(&mut self, fov: f32) {
        let kind = self.options.projection.lens;
        if let Some(session) = self.session.as_mut() {
            let _ = session.fov.set(fov, kind);
        }
        self.push_fov();
    }

    /// Drop both capture buffers and allocate new ones at the given sizes.
    ///
    /// Unlike the lazy first allocation this always reallocates. When not
    /// running the sizes are only recorded.
    pub fn reallocate_buffers(
        &mut self,
        cubemap_size: u32,
        output_size: u32,
    ) -> Result<(), OmniError> {
        self.options.capture.cubemap_size = cubemap_size;
        self.options.capture.output_size = output_size;
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        session.cubemap = None;
        session.output = None;
        log::debug!("reallocating capture buffers");
        self.allocate_buffers()
    }

    /// Start or stop recording frames. The frame clock runs at the fixed
    /// recording rate while enabled.
    pub fn set_persistence(&mut self, enabled: bool) {
        self.options.persistence.enabled = enabled;
        self.sync_frame_rate();
    }

    /// Enable or disable the reprojection pass.
    pub fn set_create_output_map(&mut self, enabled: bool) {
        self.options.capture.create_output_map = enabled;
    }

    /// Choose when the capture runs within a frame.
    pub fn set_capture_timing(&mut self, timing: CaptureTiming) {
        self.options.capture.timing = timing;
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Whether a session is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Active lens kind.
    #[must_use]
    pub fn lens_kind(&self) -> LensKind {
        self.options.projection.lens
    }

    /// Lens model of the running session.
    #[must_use]
    pub fn lens(&self) -> Option<&LensModel> {
        self.session.as_ref().map(|s| &s.lens)
    }

    /// Arcball of the running session.
    #[must_use]
    pub fn arcball(&self) -> Option<&ArcBall> {
        self.session.as_ref().map(|s| &s.arcball)
    }

    /// Current field of view in degrees.
    #[must_use]
    pub fn fov(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.fov.fov())
    }

    /// Parameters last pushed to the backend.
    #[must_use]
    pub fn uniform(&self) -> Option<&ProjectionUniform> {
        self.session.as_ref().map(|s| &s.uniform)
    }

    /// Cube-map buffer, once allocated.
    #[must_use]
    pub fn cubemap(&self) -> Option<&B::Cubemap> {
        self.session.as_ref().and_then(|s| s.cubemap.as_ref())
    }

    /// Output buffer, once allocated.
    #[must_use]
    pub fn output(&self) -> Option<&B::Output> {
        self.session.as_ref().and_then(|s| s.output.as_ref())
    }

    /// Capture viewpoint.
    #[must_use]
    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    /// Mutable capture viewpoint, e.g. to move it through the scene.
    pub fn viewpoint_mut(&mut self) -> &mut Viewpoint {
        &mut self.viewpoint
    }

    /// Display-only overlay flag.
    #[must_use]
    pub fn show_overlay(&self) -> bool {
        self.show_overlay
    }

    /// Whether the host should show its control panel.
    #[must_use]
    pub fn gui_visible(&self) -> bool {
        self.gui_visible
    }

    /// Frames advanced so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Frame clock.
    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Current options, including runtime changes.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Directory frames are written to, once created.
    #[must_use]
    pub fn output_directory(&self) -> Option<&Path> {
        self.session.as_ref().and_then(|s| s.sink.directory())
    }

    /// The rendering backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable rendering backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── Frame steps ─────────────────────────────────────────────────────

    fn handle_input(&mut self, input: &FrameInput) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        // One branch per frame, in priority order.
        if input.primary_held {
            // arcball works with y up
            let height = session.arcball.screen_size().y;
            let pointer = Vec2::new(input.pointer.x, height - input.pointer.y);
            if session.arcball.update(pointer) {
                self.viewpoint.orientation = session.arcball.rotation();
            }
        } else if input.primary_released {
            session.arcball.stop();
        } else if input.triggered(KeyAction::ResetOrientation) {
            session.arcball.reset();
            self.viewpoint.orientation = session.arcball.rotation();
        } else if input.triggered(KeyAction::ToggleOverlay) {
            self.show_overlay = !self.show_overlay;
        }

        for action in &input.actions {
            match action {
                KeyAction::ToggleGui => self.gui_visible = !self.gui_visible,
                KeyAction::NextLens => {
                    self.select_lens(self.options.projection.lens.next());
                }
                KeyAction::PreviousLens => {
                    self.select_lens(self.options.projection.lens.previous());
                }
                KeyAction::ResetOrientation | KeyAction::ToggleOverlay => {}
            }
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        let kind = self.options.projection.lens;
        let changed = self
            .session
            .as_mut()
            .is_some_and(|s| s.fov.scroll(delta, kind));
        if changed {
            self.push_fov();
        }
    }

    /// Recompute the lens from the current field of view and push it.
    fn push_fov(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        apply_fov(&mut session.lens, session.fov.fov());
        session.uniform = ProjectionUniform::new(
            &session.lens,
            self.viewpoint.rotation_matrix(),
            session.fov.fov(),
        );
        self.backend.set_projection(&session.uniform);
    }

    /// Make `kind` active at `fov` (clamped) in one step.
    fn apply_lens(&mut self, kind: LensKind, fov: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.lens.set_projection(kind);
        let _ = session.fov.set(fov, kind);
        log::debug!(
            "{kind}: fov {}, hrad/mm {}",
            session.fov.fov(),
            session.lens.hrad_per_mm()
        );
        self.push_fov();
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        log::debug!("viewport resized to {width}x{height}");
        session.lens.set_image_size(width, height);
        session.arcball.set_screen_size(width, height);
        self.push_fov();
    }

    fn sync_frame_rate(&mut self) {
        let persistence = &self.options.persistence;
        self.clock
            .set_fixed_rate(persistence.enabled.then_some(persistence.frame_rate));
    }

    /// Allocate whichever buffers do not exist yet.
    fn allocate_buffers(&mut self) -> Result<(), OmniError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let capture = &self.options.capture;
        if session.cubemap.is_none() {
            let size = cube_size(capture.cubemap_size);
            session.cubemap = Some(self.backend.create_cubemap(size)?);
        }
        if capture.create_output_map && session.output.is_none() {
            let height = capture.output_size;
            session.output =
                Some(self.backend.create_output(height.saturating_mul(2), height)?);
        }
        Ok(())
    }

    /// Steps 3–6: capture, orientation, reprojection, persistence.
    fn capture_frame(&mut self, report: &mut FrameReport) {
        if let Err(e) = self.allocate_buffers() {
            log::error!("capture buffers: {e}");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(cubemap) = session.cubemap.as_mut() else {
            return;
        };

        let camera = session
            .camera
            .get_or_insert_with(|| CaptureCamera::new(self.viewpoint.position));
        camera.position = self.viewpoint.position;
        self.backend.render_cubemap(camera, FaceMask::ALL, cubemap);
        report.captured = true;

        session.uniform.set_rotation(self.viewpoint.rotation_matrix());
        self.backend.set_projection(&session.uniform);

        if self.options.capture.create_output_map {
            if let Some(output) = session.output.as_mut() {
                self.backend.blit_projection(cubemap, output);
                report.projected = true;
            }
        }

        if self.options.persistence.enabled {
            let result = match session.output.as_ref() {
                Some(output) => self.backend.read_pixels(output).and_then(
                    |image| session.sink.write_frame(&image, report.frame),
                ),
                None => Err(OmniError::Persistence(
                    "output map is disabled".into(),
                )),
            };
            if let Err(e) = &result {
                log::warn!("frame {} not saved: {e}", report.frame);
            }
            report.persisted = Some(result);
        }
    }
}

/// Cube faces must be a power of two.
fn cube_size(requested: u32) -> u32 {
    let size = requested.max(1).checked_next_power_of_two().unwrap_or(1 << 31);
    if size != requested {
        log::warn!("cube map size {requested} rounded to {size}");
    }
    size
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::{Mat4, Quat, Vec3};
    use image::RgbaImage;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateCubemap(u32),
        CreateOutput(u32, u32),
        Render(Vec3, FaceMask),
        SetProjection(ProjectionUniform),
        Blit,
        Read,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }

        fn last_uniform(&self) -> Option<ProjectionUniform> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::SetProjection(u) => Some(*u),
                _ => None,
            })
        }
    }

    impl RenderBackend for Recorder {
        type Cubemap = u32;
        type Output = (u32, u32);

        fn create_cubemap(&mut self, size: u32) -> Result<u32, OmniError> {
            self.calls.push(Call::CreateCubemap(size));
            Ok(size)
        }

        fn create_output(
            &mut self,
            width: u32,
            height: u32,
        ) -> Result<(u32, u32), OmniError> {
            self.calls.push(Call::CreateOutput(width, height));
            Ok((width, height))
        }

        fn render_cubemap(
            &mut self,
            camera: &CaptureCamera,
            mask: FaceMask,
            _cubemap: &mut u32,
        ) {
            self.calls.push(Call::Render(camera.position, mask));
        }

        fn set_projection(&mut self, uniform: &ProjectionUniform) {
            self.calls.push(Call::SetProjection(*uniform));
        }

        fn blit_projection(&mut self, _cubemap: &u32, _output: &mut (u32, u32)) {
            self.calls.push(Call::Blit);
        }

        fn read_pixels(
            &mut self,
            output: &(u32, u32),
        ) -> Result<RgbaImage, OmniError> {
            self.calls.push(Call::Read);
            Ok(RgbaImage::new(output.0, output.1))
        }
    }

    fn small_options() -> Options {
        let mut options = Options::default();
        options.capture.cubemap_size = 16;
        options.capture.output_size = 8;
        options
    }

    fn started(options: Options) -> ProjectionManager<Recorder> {
        let mut manager = ProjectionManager::new(Recorder::default(), options);
        manager.on_start(800, 600);
        manager
    }

    fn frame(manager: &mut ProjectionManager<Recorder>, input: &FrameInput) {
        let _ = manager.on_tick(0.016, input);
        let _ = manager.on_late_tick();
    }

    fn drag_to(x: f32, y: f32) -> FrameInput {
        FrameInput {
            pointer: Vec2::new(x, y),
            primary_held: true,
            ..FrameInput::default()
        }
    }

    fn keys(actions: &[KeyAction]) -> FrameInput {
        FrameInput {
            actions: actions.to_vec(),
            ..FrameInput::default()
        }
    }

    #[test]
    fn starts_equirectangular_at_full_sphere() {
        let manager = started(small_options());
        assert_eq!(manager.lens_kind(), LensKind::Equirectangular);
        assert_eq!(manager.fov(), Some(360.0));
        let lens = manager.lens().unwrap();
        assert_eq!(lens.image_size(), (800, 600));
        assert_eq!(lens.kind(), LensKind::Equirectangular);
        let uniform = manager.backend().last_uniform().unwrap();
        assert_eq!(uniform.lens_kind, LensKind::Equirectangular.tag());
    }

    #[test]
    fn configured_fov_is_clamped_at_start() {
        let mut options = small_options();
        options.projection.lens = LensKind::Rectilinear;
        options.projection.fov = 500.0;
        let manager = started(options);
        assert_eq!(manager.fov(), Some(179.0));
        let lens = manager.lens().unwrap();
        assert!((lens.focal_length() - lens.fov_to_fl(179.0)).abs() < 1e-6);
    }

    #[test]
    fn fov_clamps_per_lens_kind() {
        let mut manager = started(small_options());
        manager.select_lens(LensKind::Rectilinear);
        manager.set_fov(500.0);
        assert_eq!(manager.fov(), Some(179.0));
        assert_eq!(manager.backend().last_uniform().unwrap().fov, 179.0);

        manager.select_lens(LensKind::Equirectangular);
        manager.set_fov(45.0);
        assert_eq!(manager.fov(), Some(360.0));
        let zoom = FrameInput {
            scroll: 10.0,
            ..FrameInput::default()
        };
        frame(&mut manager, &zoom);
        assert_eq!(manager.fov(), Some(360.0));
    }

    #[test]
    fn scrolling_moves_fov_and_focal_length() {
        let mut options = small_options();
        options.projection.fov_sensitivity = 2.0;
        let mut manager = started(options);
        manager.select_lens(LensKind::Equidistant);
        let before = manager.lens().unwrap().focal_length();

        let zoom_in = FrameInput {
            scroll: 5.0,
            ..FrameInput::default()
        };
        frame(&mut manager, &zoom_in);
        assert_eq!(manager.fov(), Some(80.0));
        assert!(manager.lens().unwrap().focal_length() > before);

        let zoom_out = FrameInput {
            scroll: -1000.0,
            ..FrameInput::default()
        };
        frame(&mut manager, &zoom_out);
        assert_eq!(manager.fov(), Some(220.0));
    }

    #[test]
    fn lens_switch_is_one_push() {
        let mut manager = started(small_options());
        manager.set_fov(123.0);
        let before = manager.backend().calls.len();

        manager.select_lens(LensKind::Stereographic);
        let calls = &manager.backend().calls[before..];
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], Call::SetProjection(_)));
        let uniform = manager.backend().last_uniform().unwrap();

        let lens = manager.lens().unwrap();
        assert_eq!(lens.kind(), LensKind::Stereographic);
        assert_eq!(uniform.lens_kind, lens.kind().tag());
        assert_eq!(uniform.fov, DEFAULT_FOV);
        assert_eq!(uniform.focal_length, lens.fov_to_fl(DEFAULT_FOV));
        assert_eq!(uniform.hrad_per_mm, lens.hrad_per_mm());
    }

    #[test]
    fn lens_keys_cycle_kinds() {
        let mut manager = started(small_options());
        frame(&mut manager, &keys(&[KeyAction::NextLens]));
        assert_eq!(manager.lens_kind(), LensKind::Cylindrical);
        frame(&mut manager, &keys(&[KeyAction::NextLens]));
        assert_eq!(manager.lens_kind(), LensKind::Rectilinear);
        frame(&mut manager, &keys(&[KeyAction::PreviousLens]));
        assert_eq!(manager.lens().unwrap().kind(), LensKind::Cylindrical);
        assert_eq!(manager.fov(), Some(90.0));
    }

    #[test]
    fn buffers_are_allocated_once() {
        let mut options = small_options();
        options.capture.cubemap_size = 100;
        let mut manager = started(options);
        for _ in 0..5 {
            frame(&mut manager, &FrameInput::default());
        }
        let backend = manager.backend();
        assert_eq!(
            backend.count(|c| matches!(c, Call::CreateCubemap(_))),
            1
        );
        assert!(backend.calls.contains(&Call::CreateCubemap(128)));
        assert_eq!(
            backend.count(|c| matches!(c, Call::CreateOutput(16, 8))),
            1
        );
        assert_eq!(
            backend.count(|c| matches!(c, Call::Render(_, FaceMask::ALL))),
            5
        );
        assert_eq!(backend.count(|c| *c == Call::Blit), 5);
        assert_eq!(manager.cubemap(), Some(&128));
    }

    #[test]
    fn reallocation_replaces_both_buffers() {
        let mut manager = started(small_options());
        frame(&mut manager, &FrameInput::default());
        manager.reallocate_buffers(64, 32).unwrap();
        assert_eq!(manager.cubemap(), Some(&64));
        assert_eq!(manager.output(), Some(&(64, 32)));
        frame(&mut manager, &FrameInput::default());
        assert_eq!(
            manager
                .backend()
                .count(|c| matches!(c, Call::CreateCubemap(_))),
            2
        );
    }

    #[test]
    fn output_map_can_be_disabled() {
        let mut options = small_options();
        options.capture.create_output_map = false;
        let mut manager = started(options);
        frame(&mut manager, &FrameInput::default());
        let backend = manager.backend();
        assert_eq!(backend.count(|c| matches!(c, Call::CreateOutput(..))), 0);
        assert_eq!(backend.count(|c| *c == Call::Blit), 0);
        assert_eq!(backend.count(|c| matches!(c, Call::Render(..))), 1);
    }

    #[test]
    fn capture_timing_picks_the_tick() {
        let mut manager = started(small_options());
        let early = manager.on_tick(0.016, &FrameInput::default());
        assert!(!early.captured);
        let late = manager.on_late_tick();
        assert!(late.captured && late.projected);
        assert_eq!(late.frame, early.frame);

        manager.set_capture_timing(CaptureTiming::BeforeScene);
        assert!(manager.on_tick(0.016, &FrameInput::default()).captured);
        assert!(!manager.on_late_tick().captured);
    }

    #[test]
    fn capture_follows_the_viewpoint() {
        let mut manager = started(small_options());
        manager.viewpoint_mut().position = Vec3::new(1.0, 2.0, 3.0);
        manager.viewpoint_mut().orientation = Quat::from_rotation_y(FRAC_PI_2);
        frame(&mut manager, &FrameInput::default());
        let backend = manager.backend();
        assert!(backend
            .calls
            .contains(&Call::Render(Vec3::new(1.0, 2.0, 3.0), FaceMask::ALL)));
        let uniform = backend.last_uniform().unwrap();
        let expected = Mat4::from_quat(Quat::from_rotation_y(FRAC_PI_2));
        assert!(uniform.rotation_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn drag_release_and_reset() {
        let initial = Quat::from_rotation_x(0.2);
        let mut manager =
            ProjectionManager::new(Recorder::default(), small_options())
                .with_viewpoint(Viewpoint::new(Vec3::ZERO, initial));
        manager.on_start(800, 600);

        frame(&mut manager, &drag_to(400.0, 300.0));
        assert_eq!(manager.viewpoint().orientation, initial);
        frame(&mut manager, &drag_to(600.0, 250.0));
        let dragged = manager.viewpoint().orientation;
        assert!(dragged.dot(initial).abs() < 0.9999);
        assert!((dragged.length() - 1.0).abs() < 1e-5);

        let release = FrameInput {
            pointer: Vec2::new(600.0, 250.0),
            primary_released: true,
            ..FrameInput::default()
        };
        frame(&mut manager, &release);
        assert!(!manager.arcball().unwrap().is_dragging());
        assert_eq!(manager.viewpoint().orientation, dragged);

        frame(&mut manager, &keys(&[KeyAction::ResetOrientation]));
        assert_eq!(manager.viewpoint().orientation, initial);
    }

    #[test]
    fn dragging_wins_over_keys() {
        let mut manager = started(small_options());
        let mut input = drag_to(400.0, 300.0);
        input.actions = vec![KeyAction::ToggleOverlay];
        frame(&mut manager, &input);
        assert!(!manager.show_overlay());

        frame(&mut manager, &keys(&[KeyAction::ToggleOverlay]));
        assert!(manager.show_overlay());
    }

    #[test]
    fn gui_toggle_is_independent() {
        let mut manager = started(small_options());
        assert!(manager.gui_visible());
        let mut input = drag_to(400.0, 300.0);
        input.actions = vec![KeyAction::ToggleGui];
        frame(&mut manager, &input);
        assert!(!manager.gui_visible());
    }

    #[test]
    fn resize_updates_lens_and_arcball() {
        let mut manager = started(small_options());
        manager.on_resize(1024, 512);
        assert_eq!(manager.lens().unwrap().image_size(), (1024, 512));
        assert_eq!(manager.arcball().unwrap().radius(), 256.0);
        let uniform = manager.backend().last_uniform().unwrap();
        assert!((uniform.sensor_mm[0] - 1.024).abs() < 1e-6);
    }

    #[test]
    fn polled_viewport_size_is_applied() {
        let mut options = small_options();
        options.capture.resize_poll_secs = 0.0;
        let mut manager = started(options);
        let input = FrameInput {
            viewport: Some((640, 480)),
            ..FrameInput::default()
        };
        frame(&mut manager, &input);
        assert_eq!(manager.lens().unwrap().image_size(), (640, 480));
        assert_eq!(
            manager.arcball().unwrap().center(),
            Vec2::new(320.0, 240.0)
        );
    }

    #[test]
    fn stop_releases_everything() {
        let mut manager = started(small_options());
        frame(&mut manager, &FrameInput::default());
        manager.on_stop();
        manager.on_stop();
        assert!(!manager.is_running());
        assert!(manager.lens().is_none());
        assert!(manager.arcball().is_none());
        assert!(manager.cubemap().is_none());

        let before = manager.backend().calls.len();
        let input = FrameInput {
            viewport: Some((10, 10)),
            scroll: 3.0,
            ..FrameInput::default()
        };
        let report = manager.on_tick(0.016, &input);
        assert!(!report.captured);
        assert!(!manager.on_late_tick().captured);
        assert_eq!(manager.backend().calls.len(), before);
    }

    #[test]
    fn recording_writes_sequence_frames() {
        let root = std::env::temp_dir()
            .join(format!("omnicam-manager-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        let mut options = small_options();
        options.persistence.enabled = true;
        options.persistence.folder = root.join("Movie");
        let mut manager = started(options);

        assert!(manager.clock().fixed_delta().is_some());
        let _ = manager.on_tick(1.0, &FrameInput::default());
        let report = manager.on_late_tick();
        let path = report.persisted.unwrap().unwrap();
        assert_eq!(path, root.join("Movie").join("shot 0001.png"));
        assert!(path.is_file());
        assert_eq!(manager.backend().count(|c| *c == Call::Read), 1);

        manager.set_persistence(false);
        assert!(manager.clock().fixed_delta().is_none());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn recording_fixes_the_simulated_step() {
        let mut options = small_options();
        options.persistence.enabled = true;
        options.persistence.frame_rate = 25;
        options.capture.create_output_map = false;
        let mut manager = started(options);

        let report = manager.on_tick(0.5, &FrameInput::default());
        assert!((report.dt - 0.04).abs() < 1e-6);
        assert!((manager.on_late_tick().dt - 0.04).abs() < 1e-6);

        manager.set_persistence(false);
        let report = manager.on_tick(0.5, &FrameInput::default());
        assert_eq!(report.dt, 0.5);
    }

    #[test]
    fn recording_failure_does_not_stop_capture() {
        let root = std::env::temp_dir()
            .join(format!("omnicam-blocked-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        let file = root.join("file");
        std::fs::write(&file, b"x").unwrap();

        let mut options = small_options();
        options.persistence.enabled = true;
        options.persistence.folder = file.join("Movie");
        let mut manager = started(options);

        let _ = manager.on_tick(0.016, &FrameInput::default());
        let report = manager.on_late_tick();
        assert!(report.captured && report.projected);
        assert!(matches!(report.persisted, Some(Err(_))));
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn equirectangular_is_unchanged_by_a_cylindrical_detour() {
        let mut manager = started(small_options());
        let fresh_vfov = manager.lens().unwrap().vfov();
        let fresh = manager.backend().last_uniform().unwrap();

        manager.select_lens(LensKind::Cylindrical);
        assert_eq!(manager.lens().unwrap().vfov(), DEFAULT_FOV);
        manager.select_lens(LensKind::Equirectangular);

        assert_eq!(manager.lens().unwrap().vfov(), fresh_vfov);
        let uniform = manager.backend().last_uniform().unwrap();
        assert_eq!(uniform.vrad_per_mm, fresh.vrad_per_mm);
        assert_eq!(uniform.vmm_per_rad, fresh.vmm_per_rad);
        assert_eq!(uniform.hrad_per_mm, fresh.hrad_per_mm);
    }

    #[test]
    fn cube_sizes_round_up_to_powers_of_two() {
        assert_eq!(cube_size(2048), 2048);
        assert_eq!(cube_size(1000), 1024);
        assert_eq!(cube_size(0), 1);
    }
}
