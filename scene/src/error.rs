//! Error type shared by the scene crate.

/// Errors raised by entity construction, validated setters, collision
/// queries and the draw pass.
///
/// Dial parameters (opacity, rotation, gravity angle, friction) are clamped
/// rather than rejected; they only fail when the input is not finite.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A numeric argument was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    /// A numeric argument was finite but outside its accepted range.
    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange { field: &'static str, value: f64, expected: &'static str },
    /// A frame was asked to advance by a negative or non-finite amount of time.
    #[error("delta time must be finite and non-negative, got {0}")]
    InvalidDeltaTime(f64),
    /// A group was reachable from itself while flattening the scene.
    #[error("scene group contains itself")]
    CyclicGroup,
    /// An entity was still borrowed elsewhere when the draw pass needed it.
    #[error("entity {0} is borrowed elsewhere")]
    EntityBusy(uuid::Uuid),
    /// The drawing surface rejected a call.
    #[error("surface error: {0}")]
    Surface(String),
    /// A scene blueprint could not be parsed or described an invalid entity.
    #[error("invalid scene blueprint: {0}")]
    Blueprint(String),
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Blueprint(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type SceneResult<T> = Result<T, SceneError>;

/// Reject NaN and infinities, passing the value through otherwise.
///
/// # Errors
///
/// Returns [`SceneError::NonFinite`] when `value` is not finite.
pub fn finite(field: &'static str, value: f64) -> SceneResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::NonFinite { field, value })
    }
}

/// Require a finite, non-negative value.
///
/// # Errors
///
/// Returns [`SceneError::NonFinite`] or [`SceneError::OutOfRange`].
pub fn non_negative(field: &'static str, value: f64) -> SceneResult<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(SceneError::OutOfRange { field, value, expected: ">= 0" });
    }
    Ok(value)
}
