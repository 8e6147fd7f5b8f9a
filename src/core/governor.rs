use std::time::{Duration, Instant};

/// Throughput of one finished frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub total_rays: u64,
    /// Rate after throttling, never above the governor cap.
    pub rays_per_second: f64,
    /// Frame start to the final rate check, sleeps included.
    pub elapsed: Duration,
    pub throttle_sleeps: u32,
}

/// Caps measured rays per second by stretching the frame.
///
/// The ray count of a frame is fixed once its tiles are done, so every sleep
/// only grows the elapsed time and the measured rate falls monotonically.
/// The loop in [`finish`](Self::finish) therefore terminates.
#[derive(Debug, Clone)]
pub struct ThroughputGovernor {
    max_rays_per_second: f64,
    interval: Duration,
}

impl ThroughputGovernor {
    /// A cap that is not a positive finite number disables throttling.
    pub fn new(max_rays_per_second: f64, interval: Duration) -> Self {
        Self {
            max_rays_per_second,
            interval: interval.max(Duration::from_micros(1)),
        }
    }

    pub fn max_rays_per_second(&self) -> f64 {
        self.max_rays_per_second
    }

    fn is_capped(&self) -> bool {
        self.max_rays_per_second.is_finite() && self.max_rays_per_second > 0.0
    }

    /// Sleeps until `total_rays` over the time since `frame_start` is at or
    /// below the cap and returns the final figures.
    pub fn finish(&self, frame_start: Instant, total_rays: u64) -> FrameReport {
        let mut elapsed = frame_start.elapsed();
        let mut rate = rays_per_second(total_rays, elapsed);
        let mut throttle_sleeps = 0;

        if self.is_capped() {
            while rate > self.max_rays_per_second {
                std::thread::sleep(self.interval);
                throttle_sleeps += 1;
                elapsed = frame_start.elapsed();
                rate = rays_per_second(total_rays, elapsed);
            }
        }

        if throttle_sleeps > 0 {
            log::debug!(
                "throttled {total_rays} rays: {throttle_sleeps} sleeps, {:.3} Mrays/s over {:?}",
                rate / 1e6,
                elapsed
            );
        }

        FrameReport {
            total_rays,
            rays_per_second: rate,
            elapsed,
            throttle_sleeps,
        }
    }
}

impl Default for ThroughputGovernor {
    fn default() -> Self {
        Self::new(24.5e6, Duration::from_micros(500))
    }
}

/// `rays / elapsed`. A zero-length interval with work in it counts as
/// infinitely fast.
pub fn rays_per_second(rays: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        rays as f64 / secs
    } else if rays == 0 {
        0.0
    } else {
        f64::INFINITY
    }
}
