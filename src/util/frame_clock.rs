use web_time::Duration;

/// Frame counter with an optional fixed time step.
///
/// While a fixed rate is set, every frame advances by exactly
/// `1 / rate` seconds regardless of wall-clock time, so recorded image
/// sequences play back at that rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Frames advanced since creation.
    frame: u64,
    /// Fixed step per frame, if any.
    fixed_delta: Option<Duration>,
    /// Step returned by the last `advance`.
    delta: f32,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock at frame 0 following wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame: 0,
            fixed_delta: None,
            delta: 0.0,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Fix the step to `1 / frame_rate` seconds; `None` or 0 returns to
    /// wall-clock time.
    pub fn set_fixed_rate(&mut self, frame_rate: Option<u32>) {
        self.fixed_delta = frame_rate
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
    }

    /// The fixed step, if one is set.
    #[must_use]
    pub fn fixed_delta(&self) -> Option<Duration> {
        self.fixed_delta
    }

    /// Advance one frame. Returns the step to simulate with: the fixed step
    /// when set, `wall_dt` otherwise.
    pub fn advance(&mut self, wall_dt: f32) -> f32 {
        self.frame += 1;
        let dt = self.fixed_delta.map_or(wall_dt, |d| d.as_secs_f32());
        self.delta = dt;
        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        dt
    }

    /// Step of the current frame in seconds, as returned by the last
    /// [`advance`](Self::advance).
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Frames advanced so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Smoothed frames per second of simulated time.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
