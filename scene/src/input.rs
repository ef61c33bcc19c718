//! Input model: pointer and keyboard events, and the state handlers see.
//!
//! The host (a browser shell, a test, the CLI) turns its native events into
//! [`PointerEvent`] and [`KeyEvent`] values and hands them to
//! [`crate::scene::Scene::handle_pointer`] / [`crate::scene::Scene::handle_key`].
//! The scene rescales pointer offsets from on-screen pixels to the surface's
//! backing resolution with a [`PointerScale`], updates its [`InputState`] and
//! then calls the matching [`InputHandler`] method.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::{Point, Size};

/// Which pointer event occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Click,
    Down,
    Move,
    Up,
}

/// A pointer event in on-screen (display) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Offset from the surface's top-left corner, in display pixels.
    pub offset: Point,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, offset: Point::new(x, y) }
    }
}

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Down,
    Up,
}

/// A keyboard key code.
///
/// The inner string holds the physical key code as reported by the host
/// (e.g. `"ArrowLeft"`, `"Space"`, `"KeyA"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyKind,
    pub code: Key,
}

impl KeyEvent {
    #[must_use]
    pub fn new(kind: KeyKind, code: impl Into<String>) -> Self {
        Self { kind, code: Key::new(code) }
    }
}

/// Input state visible to handlers and entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Last pointer position, in backing-resolution coordinates.
    pub pointer: Point,
    /// The key being dispatched. `Some` only while a key handler runs.
    pub key: Option<Key>,
}

/// Ratio of a surface's backing resolution to its displayed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerScale {
    pub x: f64,
    pub y: f64,
}

impl Default for PointerScale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl PointerScale {
    /// Scale from `display` to `backing`. An axis with a zero (or otherwise
    /// unusable) display size scales by 1.
    #[must_use]
    pub fn between(backing: Size, display: Size) -> Self {
        Self { x: ratio(backing.width, display.width), y: ratio(backing.height, display.height) }
    }

    /// Map a display offset to whole backing pixels.
    #[must_use]
    pub fn apply(&self, offset: Point) -> Point {
        Point::new((offset.x * self.x).floor(), (offset.y * self.y).floor())
    }
}

fn ratio(backing: f64, display: f64) -> f64 {
    let r = backing / display;
    if display > 0.0 && r.is_finite() { r } else { 1.0 }
}

/// Callbacks for injected input events. Every method defaults to a no-op.
pub trait InputHandler {
    fn on_click(&mut self, _input: &InputState) {}

    fn on_pointer_down(&mut self, _input: &InputState) {}

    fn on_pointer_move(&mut self, _input: &InputState) {}

    fn on_pointer_up(&mut self, _input: &InputState) {}

    fn on_key_down(&mut self, _input: &InputState) {}

    fn on_key_up(&mut self, _input: &InputState) {}
}

/// Handler that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputHandler for NoInput {}
