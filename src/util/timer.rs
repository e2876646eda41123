//! Wall-clock frame timing for frame-rate independent movement.

use std::time::Instant;

/// Measures the elapsed time between frames and the total run time.
pub struct FrameTimer {
    started: Instant,
    prev: Instant,
}

impl FrameTimer {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            prev: now,
        }
    }

    /// Seconds since the previous call (or since `start` on the first call).
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.prev).as_secs_f32();
        self.prev = now;
        delta
    }

    /// Seconds since the timer was started.
    pub fn run_time(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_monotonic_and_resets() {
        let mut timer = FrameTimer::start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let first = timer.delta();
        assert!(first >= 0.005);
        // Second delta measures only the time since the first call.
        let second = timer.delta();
        assert!(second < first);
    }

    #[test]
    fn run_time_accumulates() {
        let mut timer = FrameTimer::start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        timer.delta();
        std::thread::sleep(std::time::Duration::from_millis(5));
        timer.delta();
        assert!(timer.run_time() >= 0.010);
    }
}
