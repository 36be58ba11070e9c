/// Per-frame delta sanitizer.
/// Hosts hand us wall-clock deltas; a backgrounded tab or a debugger pause can
/// produce multi-second gaps that would make bodies visibly teleport.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// Largest delta a single frame may advance, in seconds.
    max_dt: f32,
    /// Total clamped time seen so far.
    elapsed: f64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt: max_dt.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Clamp a raw frame delta into `[0, max_dt]`. NaN and negative deltas become 0.
    pub fn clamp(&self, raw_dt: f32) -> f32 {
        if raw_dt.is_nan() || raw_dt <= 0.0 {
            0.0
        } else {
            raw_dt.min(self.max_dt)
        }
    }

    /// Clamp and record a frame delta. Returns the delta the frame should use.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        let dt = self.clamp(raw_dt);
        if dt != raw_dt {
            log::debug!("frame delta {raw_dt} clamped to {dt}");
        }
        self.elapsed += dt as f64;
        dt
    }

    /// Total clamped seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Fixed timestep accumulator.
/// Turns variable frame deltas into whole ticks of a fixed length,
/// e.g. a 50 ms charge tick that must not depend on display refresh rate.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Upper bound on ticks produced by a single frame.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        // Tolerate float dust so 5 × 0.05 yields exactly 5 ticks.
        let steps = ((self.accumulator + self.dt * 1e-4) / self.dt) as u32;
        self.accumulator = (self.accumulator - steps as f32 * self.dt).max(0.0);
        steps
    }

    /// Drop any partial tick, e.g. when the thing being ticked changes mode.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Frame-rate budget gate.
/// Admits at most one step per frame, and only once `1 / fps` seconds have
/// passed since the previously admitted step. Frames that arrive faster than
/// the budget are coalesced; a slow frame still yields a single step and any
/// surplus time is discarded.
#[derive(Debug, Clone, Copy)]
pub struct FrameGate {
    frame_time: f32,
    since_last: f32,
}

impl FrameGate {
    pub fn new(fps: f32) -> Self {
        Self {
            frame_time: 1.0 / fps.max(1.0),
            since_last: 0.0,
        }
    }

    /// Feed one frame's delta. Returns true when a step should run this frame.
    pub fn admit(&mut self, dt: f32) -> bool {
        self.since_last += dt.max(0.0);
        if self.since_last >= self.frame_time {
            self.since_last = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limits_large_gaps() {
        let clock = FrameClock::new(0.25);
        assert_eq!(clock.clamp(3.0), 0.25);
        assert_eq!(clock.clamp(0.016), 0.016);
    }

    #[test]
    fn clamp_zeroes_negative_and_nan() {
        let clock = FrameClock::new(0.25);
        assert_eq!(clock.clamp(-1.0), 0.0);
        assert_eq!(clock.clamp(f32::NAN), 0.0);
    }

    #[test]
    fn advance_accumulates_clamped_time() {
        let mut clock = FrameClock::new(0.25);
        clock.advance(0.1);
        clock.advance(10.0);
        assert!((clock.elapsed() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn fifty_ms_ticks_are_whole() {
        let mut ts = FixedTimestep::new(0.05);
        let mut total = 0;
        for _ in 0..5 {
            total += ts.accumulate(0.05);
        }
        assert_eq!(total, 5);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn reset_drops_the_partial_tick() {
        let mut ts = FixedTimestep::new(0.05);
        assert_eq!(ts.accumulate(0.04), 0);
        ts.reset();
        assert_eq!(ts.accumulate(0.02), 0);
        assert_eq!(ts.accumulate(0.03), 1);
    }

    #[test]
    fn caps_steps_per_frame() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn gate_coalesces_fast_frames() {
        let mut gate = FrameGate::new(120.0);
        // 240 Hz display: every other frame is admitted
        assert!(!gate.admit(1.0 / 240.0));
        assert!(gate.admit(1.0 / 240.0 + 1e-6));
        assert!(!gate.admit(1.0 / 240.0));
    }

    #[test]
    fn gate_slow_frame_yields_one_step() {
        let mut gate = FrameGate::new(120.0);
        assert!(gate.admit(0.1));
        // surplus from the slow frame is discarded
        assert!(!gate.admit(0.001));
    }
}
