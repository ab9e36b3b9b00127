//! Elapsed-time tracking
//!
//! Time advances only through `tick`, fed the frame delta by the app loop.

/// Stopwatch for one puzzle run
#[derive(Debug, Clone, Default)]
pub struct PuzzleTimer {
    elapsed: f32,
    running: bool,
}

impl PuzzleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero and start counting
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running && dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// `mm:ss:mmm`. Minutes are not wrapped at an hour.
pub fn format_time(seconds: f32) -> String {
    let t = seconds.max(0.0);
    let m = (t / 60.0).floor() as u32;
    let s = (t % 60.0).floor() as u32;
    let ms = ((t * 1000.0) % 1000.0).floor() as u32;
    format!("{m:02}:{s:02}:{ms:03}")
}

/// A flag that stays up for a fixed time after being raised.
/// Raising it again restarts the countdown.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    remaining: f32,
}

impl Flash {
    pub fn trigger(&mut self, duration: f32) {
        self.remaining = duration;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}
