//! Shared numeric constants for the scene crate.

// ── Geometry ────────────────────────────────────────────────────

/// Number of vertices in a circle's polygonal hull.
pub const CIRCLE_HULL_SEGMENTS: usize = 36;

/// Full turn in degrees.
pub const FULL_TURN_DEG: f64 = 360.0;

/// Upper bound of the gravity angle in degrees (0 pulls down, 180 pulls up).
pub const MAX_GRAVITY_ANGLE_DEG: f64 = 180.0;

// ── Collision ───────────────────────────────────────────────────

/// Extra distance added when pushing an entity out of another, so that the
/// two hulls no longer share an edge afterwards.
pub const CONTACT_SLOP: f64 = 1e-6;

// ── Timing ──────────────────────────────────────────────────────

/// Frame rate assumed when `draw` is called without a timestamp.
pub const DEFAULT_FPS: f64 = 60.0;

/// Lowest frame rate the delta-time clamp allows for.
pub const MIN_FPS: f64 = 30.0;

// ── Text ────────────────────────────────────────────────────────

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default font family.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
