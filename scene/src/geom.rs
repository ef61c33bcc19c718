//! Planar geometry: points, sizes, rectangles and polar conversion.
//!
//! Angles are in degrees throughout, matching the entity motion model.
//! Hull vertices are rotated about a pivot by converting to polar form,
//! adding the rotation, and converting back.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::FULL_TURN_DEG;
use crate::error::{SceneResult, finite};

/// A point in surface (backing-resolution) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a surface, image or video frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Polar coordinates: distance from the origin and angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub distance: f64,
    /// Angle in `[0, 360)`, or NaN when `distance` is zero.
    pub angle: f64,
}

/// Convert Cartesian coordinates to polar form.
///
/// The angle is normalized to `[0, 360)`. A point at the origin has no
/// direction, so its angle is NaN; callers must handle that case.
///
/// # Errors
///
/// Returns [`crate::SceneError::NonFinite`] for NaN or infinite input.
pub fn to_polar(x: f64, y: f64) -> SceneResult<Polar> {
    Ok(polar(finite("x", x)?, finite("y", y)?))
}

/// Convert polar coordinates (angle in degrees) to Cartesian form.
///
/// # Errors
///
/// Returns [`crate::SceneError::NonFinite`] for NaN or infinite input.
pub fn to_cartesian(distance: f64, angle: f64) -> SceneResult<Point> {
    Ok(cartesian(finite("distance", distance)?, finite("angle", angle)?))
}

pub(crate) fn polar(x: f64, y: f64) -> Polar {
    let distance = x.hypot(y);
    let angle = if distance == 0.0 {
        f64::NAN
    } else {
        normalize_degrees(y.atan2(x).to_degrees())
    };
    Polar { distance, angle }
}

pub(crate) fn cartesian(distance: f64, angle: f64) -> Point {
    let rad = angle.to_radians();
    Point::new(distance * rad.cos(), distance * rad.sin())
}

/// Normalize an angle in degrees to `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped }
}

/// Rotate `point` about `pivot` by `degrees` through a polar round trip.
///
/// A point sitting exactly on the pivot is returned unchanged.
#[must_use]
pub fn rotate_about(point: Point, pivot: Point, degrees: f64) -> Point {
    let rel = point - pivot;
    let p = polar(rel.x, rel.y);
    if p.distance == 0.0 {
        return point;
    }
    pivot + cartesian(p.distance, p.angle + degrees)
}

/// Axis-aligned bounds of a vertex set, or `None` when it is empty.
#[must_use]
pub fn bounds(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}
