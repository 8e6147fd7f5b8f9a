//! Timers fed with frame deltas. Each owns its state and decides when to fire.

/// Fires at a fixed frequency.
#[derive(Debug, Clone, Copy)]
pub struct FixedHz {
    pub interval: f32,
    pub accumulator: f32,
}

impl FixedHz {
    pub fn new(hz: f32) -> Self {
        Self {
            interval: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    /// Update with delta, returns true if should fire
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;

        if self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            true
        } else {
            false
        }
    }

    /// Seconds left until the next fire.
    pub fn remaining(&self) -> f32 {
        (self.interval - self.accumulator).max(0.0)
    }

    /// Forgets intervals missed by a slow frame instead of firing them back
    /// to back. The next fire is then a full interval away.
    pub fn drop_backlog(&mut self) {
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
        }
    }
}

/// Minimum interval between fires.
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: min_interval, // Allow immediate first tick
        }
    }

    /// Attempt to fire, returns true if enough time has passed
    pub fn try_tick(&mut self, delta: f32) -> bool {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            self.time_since_last = 0.0;
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
    fn fixed_hz_fires_at_rate() {
        let mut timer = FixedHz::new(60.0);

        assert!(!timer.tick(0.01));
        assert!(timer.tick(0.01));
        assert!(!timer.tick(0.001));
    }

    #[test]
    fn fixed_hz_drops_backlog() {
        let mut timer = FixedHz::new(10.0);

        assert!(timer.tick(0.55));
        timer.drop_backlog();
        assert!(!timer.tick(0.0));
        assert!(timer.remaining() > 0.0);
    }

    #[test]
    fn throttled_enforces_minimum() {
        let mut timer = Throttled::new(0.1);

        assert!(timer.try_tick(0.05));  // First fire immediate
        assert!(!timer.try_tick(0.05)); // Too soon
        assert!(timer.try_tick(0.06));  // Enough time
    }
}
