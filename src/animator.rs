//! Time-based frame selection for the runner animation.
//!
//! The clock only remembers when the current frame sequence started playing;
//! the frame index is a pure function of that instant, `now`, and the frame rate.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Start instant plus playback speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClock {
    pub start: Instant,
    /// Frames per second.
    pub frame_rate: u32,
}

impl AnimationClock {
    pub fn new(start: Instant, frame_rate: u32) -> Self {
        Self { start, frame_rate }
    }

    /// Fresh clock starting at `now`; index 0 shows immediately.
    pub fn reset(self, now: Instant) -> Self {
        Self { start: now, ..self }
    }
}

/// `max(1, 1000 / frame_rate)` in milliseconds; a zero rate counts as 1 fps.
#[inline]
pub fn ticks_per_frame(frame_rate: u32) -> u64 {
    (1000 / frame_rate.max(1) as u64).max(1)
}

/// Which frame to show at `now`.
/// An instant before the clock start counts as zero elapsed time.
pub fn current_index(clock: &AnimationClock, now: Instant, frame_count: NonZeroUsize) -> usize {
    let elapsed = now.saturating_duration_since(clock.start);
    index_at(elapsed, clock.frame_rate, frame_count)
}

/// Same as [`current_index`] but from an already-measured elapsed time.
#[inline]
pub fn index_at(elapsed: Duration, frame_rate: u32, frame_count: NonZeroUsize) -> usize {
    let step = elapsed.as_millis() as u64 / ticks_per_frame(frame_rate);
    (step % frame_count.get() as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    #[test]
    fn test_ticks_per_frame() {
        assert_eq!(ticks_per_frame(10), 100);
        assert_eq!(ticks_per_frame(60), 16);
        assert_eq!(ticks_per_frame(0), 1000);
        assert_eq!(ticks_per_frame(5000), 1);
    }

    #[test]
    fn test_index_at_250ms_is_two() {
        let start = Instant::now();
        let clock = AnimationClock::new(start, 10);
        assert_eq!(current_index(&clock, start + Duration::from_millis(250), n(6)), 2);
    }

    #[test]
    fn test_wraps_after_full_cycle() {
        let start = Instant::now();
        let clock = AnimationClock::new(start, 10);
        assert_eq!(current_index(&clock, start + Duration::from_millis(599), n(6)), 5);
        assert_eq!(current_index(&clock, start + Duration::from_millis(600), n(6)), 0);
    }

    #[test]
    fn test_reset_shows_first_frame() {
        let start = Instant::now();
        let later = start + Duration::from_millis(730);
        let clock = AnimationClock::new(start, 10);
        assert_eq!(current_index(&clock, later, n(6)), 1);

        let clock = clock.reset(later);
        assert_eq!(current_index(&clock, later, n(6)), 0);
        assert_eq!(clock.frame_rate, 10);
    }

    #[test]
    fn test_now_before_start_is_zero() {
        let now = Instant::now();
        let clock = AnimationClock::new(now + Duration::from_secs(1), 10);
        assert_eq!(current_index(&clock, now, n(4)), 0);
    }
}
