use std::time::{Duration, Instant};

/// Elapsed-time counter plus the pause used between cycles.
pub trait Clock {
    /// Milliseconds since the clock was started. Never decreases.
    fn elapsed_ms(&self) -> u64;

    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation anchored at construction time.
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        MonotonicClock {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn elapsed_ms(&self) -> u64 {
        // u64 milliseconds outlasts any realistic run
        self.start.elapsed().as_millis() as u64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_advances_across_sleep() {
        let clock = MonotonicClock::start();
        let before = clock.elapsed_ms();
        clock.sleep(Duration::from_millis(5));
        let after = clock.elapsed_ms();
        assert!(after >= before + 5, "before {before}, after {after}");
    }
}
