//! Containment tests and collision result types.
//!
//! Containment on a hull uses the even-odd rule: a horizontal ray cast from
//! the point crosses the hull boundary an odd number of times exactly when
//! the point is inside. Points lying on an edge may fall either way.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::error::{SceneResult, non_negative};
use crate::geom::{Point, Rect};

/// Side an entity was pushed towards when a collision was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Overlap could not be measured along either axis.
    Indeterminate,
}

impl Direction {
    /// Numeric code exposed to calling code: `1..=5` in declaration order.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Up => 1,
            Self::Down => 2,
            Self::Left => 3,
            Self::Right => 4,
            Self::Indeterminate => 5,
        }
    }
}

/// Outcome of [`crate::entity::Entity::collide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// No collision (or the check was skipped by throttling).
    None,
    /// Collision detected; repositioning was not requested.
    Contact,
    /// Collision detected and resolved by pushing towards `Direction`.
    Resolved(Direction),
}

impl Collision {
    #[must_use]
    pub fn is_collision(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Resolved(direction) => Some(direction),
            Self::None | Self::Contact => None,
        }
    }
}

/// Options for [`crate::entity::Entity::collide`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollideOptions {
    /// Push the entity out of the other one when they collide.
    pub reposition: bool,
    /// Extra gap left between the two after repositioning.
    pub padding: f64,
    /// Only run the test on every `skip + 1`-th call.
    pub skip: u32,
}

impl CollideOptions {
    /// Detection only.
    #[must_use]
    pub fn detect() -> Self {
        Self::default()
    }

    /// Detection plus repositioning with the given padding.
    #[must_use]
    pub fn resolve(padding: f64) -> Self {
        Self { reposition: true, padding, skip: 0 }
    }

    #[must_use]
    pub fn skipping(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    pub(crate) fn validate(&self) -> SceneResult<()> {
        non_negative("padding", self.padding)?;
        Ok(())
    }
}

/// Even-odd ray-cast test of `p` against the closed ring `hull`.
#[must_use]
pub fn hull_contains(hull: &[Point], p: Point) -> bool {
    let mut inside = false;
    let n = hull.len();
    if n == 0 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let a = hull[i];
        let b = hull[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Half-open box test: `x ∈ (left, right]`, `y ∈ (top, bottom]`.
#[must_use]
pub fn box_contains(rect: Rect, p: Point) -> bool {
    p.x > rect.x && p.x <= rect.right() && p.y > rect.y && p.y <= rect.bottom()
}

/// Pick the push-out direction for `this` overlapping `other`.
///
/// The axis with the smaller overlap wins; ties go to the vertical axis.
/// Returns the direction and the signed displacement to apply to `this`.
#[must_use]
pub fn resolve_overlap(this: Rect, other: Rect, gap: f64) -> (Direction, Point) {
    let from_above = this.bottom() - other.y;
    let from_below = other.bottom() - this.y;
    let from_left = this.right() - other.x;
    let from_right = other.right() - this.x;
    let overlap_y = from_above.min(from_below);
    let overlap_x = from_left.min(from_right);

    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(overlap_x) || !usable(overlap_y) {
        return (Direction::Indeterminate, Point::zero());
    }

    if overlap_y <= overlap_x {
        if from_above <= from_below {
            (Direction::Up, Point::new(0.0, -(from_above + gap)))
        } else {
            (Direction::Down, Point::new(0.0, from_below + gap))
        }
    } else if from_left <= from_right {
        (Direction::Left, Point::new(-(from_left + gap), 0.0))
    } else {
        (Direction::Right, Point::new(from_right + gap, 0.0))
    }
}
