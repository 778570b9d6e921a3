/// Per-frame timing, computed once at the start of a frame and held
/// constant for the rest of that frame's logic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    /// Host time at the start of this frame, in seconds.
    pub current_time: f32,
    /// Seconds since the previous frame. Never negative.
    pub delta_time: f32,
}

/// Wall-clock delta tracker.
/// The host supplies monotonic seconds; the clock turns them into deltas.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    last_frame: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self { last_frame: 0.0 }
    }

    /// Start the frame at `now` seconds and return its timing.
    /// A host clock that steps backwards yields a zero delta.
    pub fn tick(&mut self, now: f32) -> FrameTiming {
        let delta_time = (now - self.last_frame).max(0.0);
        self.last_frame = now;
        FrameTiming {
            current_time: now,
            delta_time,
        }
    }

    /// Time of the most recent tick.
    pub fn last_frame(&self) -> f32 {
        self.last_frame
    }
}

/// Real-time threshold gate.
/// Accumulates frame deltas and fires at most once per call when the
/// accumulated time reaches the interval. Excess time is discarded on fire.
#[derive(Debug, Clone)]
pub struct ThresholdStepper {
    /// Seconds that must accumulate before a step fires.
    interval: f32,
    accumulator: f32,
}

impl ThresholdStepper {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    /// Add frame time. Returns true when a step fires.
    pub fn accumulate(&mut self, frame_dt: f32) -> bool {
        self.accumulator += frame_dt.max(0.0);
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    /// Time accumulated towards the next step.
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_measures_from_zero() {
        let mut clock = Clock::new();
        let t = clock.tick(0.5);
        assert_eq!(t.current_time, 0.5);
        assert_eq!(t.delta_time, 0.5);
    }

    #[test]
    fn delta_between_ticks() {
        let mut clock = Clock::new();
        clock.tick(1.0);
        let t = clock.tick(1.25);
        assert!((t.delta_time - 0.25).abs() < 1e-6);
    }

    #[test]
    fn backwards_clock_gives_zero_delta() {
        let mut clock = Clock::new();
        clock.tick(2.0);
        let t = clock.tick(1.0);
        assert_eq!(t.delta_time, 0.0);
        assert_eq!(clock.last_frame(), 1.0);
    }

    #[test]
    fn stepper_fires_once_at_interval() {
        let mut gate = ThresholdStepper::new(1.0 / 65.0);
        assert!(gate.accumulate(1.0 / 65.0));
        assert_eq!(gate.pending(), 0.0);
    }

    #[test]
    fn stepper_accumulates_partial() {
        let mut gate = ThresholdStepper::new(0.02);
        assert!(!gate.accumulate(0.008));
        assert!(!gate.accumulate(0.008));
        assert!(gate.accumulate(0.008));
    }

    #[test]
    fn stepper_fires_at_most_once_per_call() {
        let mut gate = ThresholdStepper::new(0.01);
        // Ten intervals worth of time still produce a single step.
        assert!(gate.accumulate(0.1));
        assert_eq!(gate.pending(), 0.0);
        assert!(!gate.accumulate(0.005));
    }
}
