//! Time keeping: a pausable stopwatch and the per-frame delta clock.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use tracing::debug;

use crate::config::SceneConfig;
use crate::error::{SceneResult, finite};

/// Wall-clock milliseconds since the Unix epoch.
///
/// Browser builds read `Date.now()`; native builds read the system clock.
#[must_use]
pub fn now_ms() -> f64 {
    #[cfg(feature = "web")]
    {
        crate::web::now_ms()
    }
    #[cfg(not(feature = "web"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}

/// Milliseconds from `since` to `now`; a clock that stepped backwards counts as zero.
fn gap(since: f64, now: f64) -> f64 {
    (now - since).max(0.0)
}

/// Stopwatch that tracks running time and paused time separately, in
/// milliseconds.
///
/// Every operation has an `_at` variant taking the current time in
/// milliseconds (as from [`now_ms`]), so callers (and tests) can drive it
/// from their own clock.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    running_since: Option<f64>,
    paused_since: Option<f64>,
    elapsed: f64,
    paused: f64,
}

impl Stopwatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopwatch that is already running.
    #[must_use]
    pub fn start_new() -> Self {
        let mut watch = Self::new();
        watch.start();
        watch
    }

    /// Reset and start counting.
    pub fn start(&mut self) {
        self.start_at(now_ms());
    }

    pub fn start_at(&mut self, now: f64) {
        self.reset();
        self.running_since = Some(now);
    }

    /// Stop counting running time and start counting paused time.
    /// No effect unless running.
    pub fn pause(&mut self) {
        self.pause_at(now_ms());
    }

    pub fn pause_at(&mut self, now: f64) {
        if let Some(since) = self.running_since.take() {
            self.elapsed += gap(since, now);
            self.paused_since = Some(now);
        }
    }

    /// Continue after a pause. No effect unless paused.
    pub fn resume(&mut self) {
        self.resume_at(now_ms());
    }

    pub fn resume_at(&mut self, now: f64) {
        if let Some(since) = self.paused_since.take() {
            self.paused += gap(since, now);
            self.running_since = Some(now);
        }
    }

    /// Freeze both totals. They stay readable until the next start or reset.
    pub fn stop(&mut self) {
        self.stop_at(now_ms());
    }

    pub fn stop_at(&mut self, now: f64) {
        if let Some(since) = self.running_since.take() {
            self.elapsed += gap(since, now);
        }
        if let Some(since) = self.paused_since.take() {
            self.paused += gap(since, now);
        }
    }

    /// Back to zero, not running.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Running time in milliseconds, excluding pauses.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(now_ms())
    }

    #[must_use]
    pub fn elapsed_at(&self, now: f64) -> f64 {
        self.elapsed + self.running_since.map_or(0.0, |since| gap(since, now))
    }

    /// Total time spent paused, in milliseconds.
    #[must_use]
    pub fn paused(&self) -> f64 {
        self.paused_at(now_ms())
    }

    #[must_use]
    pub fn paused_at(&self, now: f64) -> f64 {
        self.paused + self.paused_since.map_or(0.0, |since| gap(since, now))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }
}

/// Turns host frame timestamps into clamped simulation steps.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    config: SceneConfig,
    last_timestamp: Option<f64>,
    frames: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self { config, last_timestamp: None, frames: 0 }
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Timestamp (ms) of the last timestamped frame.
    #[must_use]
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Frames ticked so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Step in seconds for the frame at `timestamp` (milliseconds).
    ///
    /// Without a timestamp, or on the first timestamped frame, the step is
    /// the configured default. Otherwise it is the gap since the previous
    /// timestamp clamped to `[0, max_delta]`, so a clock that runs
    /// backwards yields a zero step.
    ///
    /// # Errors
    ///
    /// Rejects a non-finite timestamp.
    pub fn tick(&mut self, timestamp: Option<f64>) -> SceneResult<f64> {
        self.frames += 1;
        let Some(ts) = timestamp else {
            return Ok(self.config.default_step);
        };
        let ts = finite("timestamp", ts)?;
        let Some(last) = self.last_timestamp.replace(ts) else {
            return Ok(self.config.default_step);
        };
        let raw = (ts - last) / 1000.0;
        if raw < 0.0 || raw > self.config.max_delta {
            let dt = raw.clamp(0.0, self.config.max_delta);
            debug!(raw, dt, frame = self.frames, "frame delta clamped");
            return Ok(dt);
        }
        Ok(raw)
    }

    /// Forget the last timestamp, e.g. after the host was suspended.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }
}
