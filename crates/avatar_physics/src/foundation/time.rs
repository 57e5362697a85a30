//! Time management utilities
//!
//! [`FrameClock`] is the explicit simulation context for frame timing: it owns
//! the previous sample time and the accumulated clock, so independent
//! controllers never share timing state.

use std::time::{Duration, Instant};

/// Frame clock fed with host timestamps (seconds)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    previous_time: Option<f64>,
    accumulated: f64,
    delta_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock that has not yet seen a timestamp
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `now` and return the elapsed seconds since the previous call.
    ///
    /// The first call returns 0. A timestamp earlier than the previous one also
    /// yields 0 rather than a negative step.
    pub fn advance(&mut self, now: f64) -> f32 {
        let elapsed = match self.previous_time {
            Some(previous) if now > previous => now - previous,
            _ => 0.0,
        };

        self.previous_time = Some(now);
        self.accumulated += elapsed;
        self.frame_count += 1;
        #[allow(clippy::cast_possible_truncation)]
        {
            self.delta_time = elapsed as f32;
        }
        self.delta_time
    }

    /// Forget the gap up to `now` (host was suspended or hidden)
    pub fn resync(&mut self, now: f64) {
        self.previous_time = Some(now);
        self.delta_time = 0.0;
    }

    /// Seconds reported by the last [`advance`](Self::advance)
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total seconds accumulated across all frames
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Number of frames advanced
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Timestamp of the last sample, if any
    pub fn previous_time(&self) -> Option<f64> {
        self.previous_time
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}
