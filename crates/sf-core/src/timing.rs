//! Wall-clock timing for solver stages.
//!
//! Timers always measure; `SF_TIMING` controls whether the elapsed time is
//! also emitted as a `tracing` event when the timer stops.

use std::time::Instant;

/// Timing events are emitted when `SF_TIMING` is set.
fn is_enabled() -> bool {
    std::env::var_os("SF_TIMING").is_some()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Seconds since the timer started.
    pub fn elapsed_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Stop the timer, emit a debug event if enabled, and return elapsed seconds.
    pub fn stop(self) -> f64 {
        let elapsed = self.elapsed_s();
        if is_enabled() {
            tracing::debug!(stage = self.label, elapsed_s = elapsed, "stage finished");
        }
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_reports_non_negative_elapsed() {
        let t = Timer::start("test");
        assert!(t.stop() >= 0.0);
    }
}
