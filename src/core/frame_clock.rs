use std::time::Duration;

use super::clock::Clock;
use super::timer::FixedHz;

/// One frame slot handed out by [`FrameClock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frames handed out so far, starting at 1.
    pub number: u64,
    /// Seconds since the previous tick.
    pub delta: f32,
}

/// Paces the render loop at a fixed rate.
///
/// A frame that overruns its slot does not queue extra frames; the next tick
/// is simply due one interval later.
#[derive(Debug)]
pub struct FrameClock {
    clock: Clock,
    since_tick: Clock,
    timer: FixedHz,
    frames: u64,
}

impl FrameClock {
    pub fn new(hz: f32) -> Self {
        Self {
            clock: Clock::new(),
            since_tick: Clock::new(),
            timer: FixedHz::new(hz.max(0.001)),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Blocks until the next frame is due.
    pub fn wait_next(&mut self) -> FrameTick {
        loop {
            if self.timer.tick(self.clock.tick()) {
                self.timer.drop_backlog();
                break;
            }
            std::thread::sleep(Duration::from_secs_f32(self.timer.remaining()));
        }

        self.frames += 1;
        FrameTick {
            number: self.frames,
            delta: self.since_tick.tick(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}
