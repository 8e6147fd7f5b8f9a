use std::time::{Duration, Instant};

/// Tracks time between consecutive frames.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds since the previous tick; advances the clock.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Time since the previous tick without advancing.
    pub fn peek(&self) -> Duration {
        self.last_tick.elapsed()
    }

    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clock_measures_delta() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();

        assert!(delta >= 0.009);
        assert!(clock.peek() < Duration::from_millis(10));
    }

    #[test]
    fn clock_resets() {
        let mut clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        clock.reset();

        let delta = clock.tick();
        assert!(delta < 0.005);
    }
}
