//! Frame timing configuration.
//!
//! Two numbers drive the draw loop: the step used when the host does not
//! supply a timestamp, and the ceiling on the step computed from timestamps.
//! Both are expressed in seconds but configured as frame rates.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{DEFAULT_FPS, MIN_FPS};
use crate::error::{SceneError, SceneResult, finite};

/// Environment variable overriding the assumed frame rate.
pub const FPS_ENV: &str = "SCENE_FPS";

/// Environment variable overriding the lowest frame rate the clamp allows for.
pub const MIN_FPS_ENV: &str = "SCENE_MIN_FPS";

/// Delta-time settings for [`crate::scene::Scene::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Step in seconds used for frames drawn without a timestamp.
    pub default_step: f64,
    /// Largest step in seconds a timestamped frame may advance.
    pub max_delta: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { default_step: 1.0 / DEFAULT_FPS, max_delta: 1.0 / MIN_FPS }
    }
}

impl SceneConfig {
    /// Build from frame rates: `fps` sets the default step and `min_fps`
    /// the ceiling.
    ///
    /// # Errors
    ///
    /// Both rates must be finite and positive.
    pub fn from_fps(fps: f64, min_fps: f64) -> SceneResult<Self> {
        let config = Self { default_step: 1.0 / positive("fps", fps)?, max_delta: 1.0 / positive("min fps", min_fps)? };
        Ok(config)
    }

    /// Read `SCENE_FPS` and `SCENE_MIN_FPS`, falling back to the defaults for
    /// unset, unparsable or non-positive values.
    #[must_use]
    pub fn from_env() -> Self {
        let fps = env_rate(FPS_ENV, DEFAULT_FPS);
        let min_fps = env_rate(MIN_FPS_ENV, MIN_FPS);
        Self { default_step: 1.0 / fps, max_delta: 1.0 / min_fps }
    }

    /// Check a deserialized configuration.
    ///
    /// # Errors
    ///
    /// Both steps must be finite and non-negative.
    pub fn validate(&self) -> SceneResult<()> {
        for (field, value) in [("default step", self.default_step), ("max delta", self.max_delta)] {
            if finite(field, value)? < 0.0 {
                return Err(SceneError::OutOfRange { field, value, expected: ">= 0" });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> SceneResult<f64> {
    if finite(field, value)? <= 0.0 {
        return Err(SceneError::OutOfRange { field, value, expected: "> 0" });
    }
    Ok(value)
}

/// Parse an environment variable, returning `default` when missing or invalid.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_rate(key: &str, default: f64) -> f64 {
    let rate = env_parse(key, default);
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        warn!(key, rate, default, "ignoring non-positive frame rate");
        default
    }
}
