use std::time::{Duration, Instant};

use quill_core::profiling::profile_function;

/// Frame timer feeding `TextBox::update`.
///
/// Deltas are capped so a stalled frame (window drag, breakpoint) does not skip
/// whole lines of dialogue at once. `time_scale` speeds up or slows down every
/// reveal, e.g. a held fast-forward key.
///
/// # Example
/// ```ignore
/// let dt = clock.tick();
/// text_box.update(dt);
/// ```
#[derive(Debug, Clone)]
pub struct FrameClock {
    elapsed: Duration,
    delta: Duration,
    frame_count: u64,
    time_scale: f32,
    max_delta: Duration,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameClock {
    /// Max delta 0.1 seconds, normal speed.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            time_scale: 1.0,
            max_delta: Duration::from_millis(100),
            start_time: now,
            last_frame_time: now,
        }
    }

    /// Start a new frame and return its scaled delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        profile_function!();
        let raw_delta = now.saturating_duration_since(self.last_frame_time);
        self.delta = raw_delta.min(self.max_delta);
        self.elapsed = now.saturating_duration_since(self.start_time);
        self.last_frame_time = now;
        self.frame_count += 1;
        self.delta_seconds()
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32() * self.time_scale
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Negative scales are clamped to 0 (paused).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn set_max_delta(&mut self, max: Duration) {
        self.max_delta = max;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_reports_delta() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame_time;
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_delta_is_capped() {
        let mut clock = FrameClock::new();
        let start = clock.last_frame_time;
        let dt = clock.tick_at(start + Duration::from_secs(5));
        assert!((dt - 0.1).abs() < 1e-6);
        assert!((clock.elapsed_seconds() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FrameClock::new();
        clock.set_time_scale(3.0);
        let start = clock.last_frame_time;
        let dt = clock.tick_at(start + Duration::from_millis(20));
        assert!((dt - 0.06).abs() < 1e-6);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.delta_seconds(), 0.0);
    }
}
