use web_time::{Duration, Instant};

/// Cooperative viewport-size poll.
///
/// Checked once per tick; acts at most once per interval, and only when the
/// size actually changed. Cancelled exactly once at teardown, after which it
/// never fires again.
#[derive(Debug, Clone)]
pub struct ResizeMonitor {
    interval: Duration,
    last_check: Instant,
    size: (u32, u32),
    cancelled: bool,
}

impl ResizeMonitor {
    /// Monitor starting at `size`, first due one `interval` after `now`.
    #[must_use]
    pub fn new(interval: Duration, size: (u32, u32), now: Instant) -> Self {
        Self {
            interval,
            last_check: now,
            size,
            cancelled: false,
        }
    }

    /// Returns the new size if the interval has elapsed and `size` differs
    /// from the last one seen.
    pub fn poll(&mut self, now: Instant, size: (u32, u32)) -> Option<(u32, u32)> {
        if self.cancelled
            || now.saturating_duration_since(self.last_check) < self.interval
        {
            return None;
        }
        self.last_check = now;
        if size == self.size {
            return None;
        }
        self.size = size;
        Some(size)
    }

    /// Record a size delivered some other way, so the next poll does not
    /// report it again.
    pub fn set_size(&mut self, size: (u32, u32)) {
        self.size = size;
    }

    /// Last size seen.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Stop polling for good. Idempotent.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            log::debug!("resize monitor cancelled");
        }
        self.cancelled = true;
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(300);

    #[test]
    fn waits_for_the_interval() {
        let start = Instant::now();
        let mut monitor = ResizeMonitor::new(TICK, (800, 600), start);
        let early = start + Duration::from_millis(100);
        assert_eq!(monitor.poll(early, (1024, 768)), None);
        assert_eq!(monitor.poll(start + TICK, (1024, 768)), Some((1024, 768)));
        assert_eq!(monitor.size(), (1024, 768));
    }

    #[test]
    fn unchanged_size_does_not_fire() {
        let start = Instant::now();
        let mut monitor = ResizeMonitor::new(TICK, (800, 600), start);
        assert_eq!(monitor.poll(start + TICK, (800, 600)), None);
        // the check itself restarts the interval
        let soon = start + TICK + Duration::from_millis(10);
        assert_eq!(monitor.poll(soon, (640, 480)), None);
        assert_eq!(monitor.poll(start + TICK * 2, (640, 480)), Some((640, 480)));
    }

    #[test]
    fn pushed_sizes_are_not_reported_again() {
        let start = Instant::now();
        let mut monitor = ResizeMonitor::new(TICK, (800, 600), start);
        monitor.set_size((1280, 720));
        assert_eq!(monitor.poll(start + TICK, (1280, 720)), None);
    }

    #[test]
    fn cancelled_monitor_never_fires() {
        let start = Instant::now();
        let mut monitor = ResizeMonitor::new(TICK, (800, 600), start);
        monitor.cancel();
        monitor.cancel();
        assert!(monitor.is_cancelled());
        assert_eq!(monitor.poll(start + TICK * 10, (1, 1)), None);
    }
}
