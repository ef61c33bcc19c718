//! Entities: placement, motion, hull geometry, containment and collision.
//!
//! An [`Entity`] pairs one [`Shape`] with the state every shape shares: a
//! top-left position, the [`Motion`] dials, opacity and the active / visible /
//! auto-update / captured flags. All geometry is derived on demand from the
//! current state; nothing is cached between calls.
//!
//! Entities are shared through [`EntityRef`] so that the scene graph, groups
//! and game code all see one authoritative position per entity.

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use uuid::Uuid;

use crate::consts::{CONTACT_SLOP, MAX_GRAVITY_ANGLE_DEG};
use crate::error::{SceneError, SceneResult, finite, non_negative};
use crate::geom::{Point, Rect, bounds, normalize_degrees, rotate_about};
use crate::hit::{CollideOptions, Collision, Direction, box_contains, hull_contains, resolve_overlap};
use crate::input::InputState;
use crate::render;
use crate::scene::Canvas;
use crate::shape::{Circle, Font, Image, ImageRef, Paint, Polygon, Rectangle, Shape, Sprite, Text, Video, VideoRef};
use crate::surface::{Surface, TextMeasure};

/// Unique identifier for an entity.
pub type EntityId = Uuid;

/// Shared, mutable handle to an entity.
pub type EntityRef = Rc<RefCell<Entity>>;

/// Motion dials integrated on every auto-updated frame.
///
/// Angles are in degrees. `rotation` stays in `[0, 360)`, `gravity_angle` in
/// `[0, 180]` (0 pulls down, 180 pulls up) and `friction_factor` in `[0, 1]`
/// where 1 means no friction.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    delta_x: f64,
    delta_y: f64,
    velocity: f64,
    friction_factor: f64,
    rotation: f64,
    delta_rotation: f64,
    gravity: f64,
    gravity_angle: f64,
    delta_gravity: f64,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            delta_x: 0.0,
            delta_y: 0.0,
            velocity: 0.0,
            friction_factor: 1.0,
            rotation: 0.0,
            delta_rotation: 0.0,
            gravity: 0.0,
            gravity_angle: 0.0,
            delta_gravity: 0.0,
        }
    }
}

impl Motion {
    #[must_use]
    pub fn delta_x(&self) -> f64 {
        self.delta_x
    }

    #[must_use]
    pub fn delta_y(&self) -> f64 {
        self.delta_y
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Multiplier applied to translational motion: 1 is frictionless, 0 is a full stop.
    #[must_use]
    pub fn friction_factor(&self) -> f64 {
        self.friction_factor
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[must_use]
    pub fn delta_rotation(&self) -> f64 {
        self.delta_rotation
    }

    #[must_use]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    #[must_use]
    pub fn gravity_angle(&self) -> f64 {
        self.gravity_angle
    }

    #[must_use]
    pub fn delta_gravity(&self) -> f64 {
        self.delta_gravity
    }

    /// # Errors
    ///
    /// Rejects non-finite input.
    pub fn set_delta(&mut self, delta_x: f64, delta_y: f64) -> SceneResult<()> {
        let delta_x = finite("delta x", delta_x)?;
        self.delta_y = finite("delta y", delta_y)?;
        self.delta_x = delta_x;
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects non-finite input.
    pub fn set_velocity(&mut self, velocity: f64) -> SceneResult<()> {
        self.velocity = finite("velocity", velocity)?;
        Ok(())
    }

    /// Set friction as a resistance in `[0, 1]`: 0 is frictionless, 1 stops
    /// all translation. Stored as `1 - friction`.
    ///
    /// # Errors
    ///
    /// Rejects non-finite input; finite input is clamped.
    pub fn set_friction(&mut self, friction: f64) -> SceneResult<()> {
        self.friction_factor = 1.0 - finite("friction", friction)?.clamp(0.0, 1.0);
        Ok(())
    }

    /// Set the stored multiplier directly, clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Rejects non-finite input.
    pub fn set_friction_factor(&mut self, factor: f64) -> SceneResult<()> {
        self.friction_factor = finite("friction factor", factor)?.clamp(0.0, 1.0);
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects non-finite input; finite input is normalized to `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) -> SceneResult<()> {
        self.rotation = normalize_degrees(finite("rotation", degrees)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects non-finite input.
    pub fn set_delta_rotation(&mut self, degrees: f64) -> SceneResult<()> {
        self.delta_rotation = finite("delta rotation", degrees)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects negative or non-finite input.
    pub fn set_gravity(&mut self, gravity: f64) -> SceneResult<()> {
        self.gravity = non_negative("gravity", gravity)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects non-finite input; finite input is clamped to `[0, 180]`.
    pub fn set_gravity_angle(&mut self, degrees: f64) -> SceneResult<()> {
        self.gravity_angle = clamp_gravity_angle(finite("gravity angle", degrees)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects non-finite input.
    pub fn set_delta_gravity(&mut self, degrees: f64) -> SceneResult<()> {
        self.delta_gravity = finite("delta gravity", degrees)?;
        Ok(())
    }

    /// Displacement for one step of `dt`.
    fn displacement(&self, dt: f64) -> Point {
        let heading = self.rotation.to_radians();
        let pull = self.gravity * self.gravity_angle.to_radians().cos();
        let dx = (self.delta_x + self.velocity * heading.cos()) * self.friction_factor * dt;
        let dy = ((self.delta_y + self.velocity * heading.sin()) * self.friction_factor + pull) * dt;
        Point::new(dx, dy)
    }

    fn advance_angles(&mut self, dt: f64) {
        self.rotation = normalize_degrees(self.rotation + self.delta_rotation * dt);
        self.gravity_angle = clamp_gravity_angle(self.gravity_angle + self.delta_gravity * dt);
    }
}

fn clamp_gravity_angle(degrees: f64) -> f64 {
    degrees.clamp(0.0, MAX_GRAVITY_ANGLE_DEG)
}

/// A drawable, movable, collidable thing on the surface.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Entity {
    id: EntityId,
    position: Point,
    motion: Motion,
    opacity: f64,
    /// Inactive entities never collide.
    pub active: bool,
    /// Invisible entities are not drawn but still move.
    pub visible: bool,
    /// Whether `update` integrates motion.
    pub auto_update: bool,
    captured: bool,
    capture_offset: Point,
    collide_calls: u64,
    shape: Shape,
}

impl Entity {
    /// Place `shape` with its top-left anchor at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Rejects a non-finite position.
    pub fn new(x: f64, y: f64, shape: Shape) -> SceneResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            position: Point::new(finite("x", x)?, finite("y", y)?),
            motion: Motion::default(),
            opacity: 1.0,
            active: true,
            visible: true,
            auto_update: true,
            captured: false,
            capture_offset: Point::zero(),
            collide_calls: 0,
            shape,
        })
    }

    /// # Errors
    ///
    /// Rejects a non-finite position or a negative radius.
    pub fn circle(x: f64, y: f64, radius: f64) -> SceneResult<Self> {
        Self::new(x, y, Shape::Circle(Circle::new(radius)?))
    }

    /// # Errors
    ///
    /// Rejects a non-finite position or negative dimensions.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> SceneResult<Self> {
        Self::new(x, y, Shape::Rectangle(Rectangle::new(width, height)?))
    }

    /// # Errors
    ///
    /// Rejects a non-finite position or vertex.
    pub fn polygon(x: f64, y: f64, vertices: Vec<Point>, anchor_adjust: bool) -> SceneResult<Self> {
        Self::new(x, y, Shape::Polygon(Polygon::new(vertices, anchor_adjust)?))
    }

    /// # Errors
    ///
    /// Rejects a non-finite position.
    pub fn text(x: f64, y: f64, content: &str, font: Font, measure: &dyn TextMeasure) -> SceneResult<Self> {
        Self::new(x, y, Shape::Text(Text::new(content, font, measure)))
    }

    /// # Errors
    ///
    /// Rejects a non-finite position.
    pub fn image(x: f64, y: f64, image: ImageRef) -> SceneResult<Self> {
        Self::new(x, y, Shape::Image(Image { image }))
    }

    /// Sprite sheet with `frames` columns and `strips` rows, advancing one
    /// frame every `ticks_per_frame` draws.
    ///
    /// # Errors
    ///
    /// Rejects a non-finite position or a zero count.
    pub fn sprite(x: f64, y: f64, sheet: ImageRef, frames: u32, ticks_per_frame: u32, strips: u32) -> SceneResult<Self> {
        Self::new(x, y, Shape::Sprite(Sprite::new(sheet, frames, ticks_per_frame, strips)?))
    }

    /// # Errors
    ///
    /// Rejects a non-finite position.
    pub fn video(x: f64, y: f64, source: VideoRef) -> SceneResult<Self> {
        Self::new(x, y, Shape::Video(Video { source }))
    }

    /// Replace the fill/stroke settings. Shapes without paint ignore this.
    #[must_use]
    pub fn with_paint(mut self, paint: Paint) -> Self {
        if let Some(slot) = self.shape.paint_mut() {
            *slot = paint;
        }
        self
    }

    /// Wrap in a shared handle for the scene graph.
    #[must_use]
    pub fn into_ref(self) -> EntityRef {
        Rc::new(RefCell::new(self))
    }

    // ── State ───────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// # Errors
    ///
    /// Rejects a non-finite position.
    pub fn set_position(&mut self, x: f64, y: f64) -> SceneResult<()> {
        let x = finite("x", x)?;
        self.position = Point::new(x, finite("y", y)?);
        Ok(())
    }

    /// Move by `(dx, dy)`.
    ///
    /// # Errors
    ///
    /// Rejects a non-finite offset.
    pub fn translate(&mut self, dx: f64, dy: f64) -> SceneResult<()> {
        let dx = finite("dx", dx)?;
        self.position = self.position + Point::new(dx, finite("dy", dy)?);
        Ok(())
    }

    #[must_use]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// # Errors
    ///
    /// Rejects non-finite input; finite input is clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) -> SceneResult<()> {
        self.opacity = finite("opacity", opacity)?.clamp(0.0, 1.0);
        Ok(())
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[must_use]
    pub fn capture_offset(&self) -> Point {
        self.capture_offset
    }

    /// Pull towards the top of the surface.
    pub fn invert_gravity(&mut self) {
        self.motion.gravity_angle = MAX_GRAVITY_ANGLE_DEG;
    }

    /// Pull towards the bottom of the surface.
    pub fn reset_gravity(&mut self) {
        self.motion.gravity_angle = 0.0;
    }

    // ── Geometry ────────────────────────────────────────────────

    #[must_use]
    pub fn width(&self) -> f64 {
        self.shape.width()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.shape.height()
    }

    /// Rotation pivot, relative to `position`.
    #[must_use]
    pub fn centroid(&self) -> Point {
        self.shape.centroid()
    }

    /// Outline in surface coordinates, rotated about the centroid.
    ///
    /// A circle's hull is rotation invariant and is never rotated.
    #[must_use]
    pub fn hull(&self) -> Vec<Point> {
        let rotation = self.motion.rotation;
        let rotate = rotation != 0.0 && !matches!(self.shape, Shape::Circle(_));
        let pivot = self.shape.centroid();
        self.shape
            .outline()
            .into_iter()
            .map(|p| {
                let local = if rotate { rotate_about(p, pivot, rotation) } else { p };
                local + self.position
            })
            .collect()
    }

    /// Axis-aligned bounds of the hull, or `None` for an empty polygon.
    #[must_use]
    pub fn hull_bounds(&self) -> Option<Rect> {
        bounds(&self.hull())
    }

    #[must_use]
    pub fn hull_width(&self) -> f64 {
        self.hull_bounds().map_or(0.0, |b| b.width)
    }

    #[must_use]
    pub fn hull_height(&self) -> f64 {
        self.hull_bounds().map_or(0.0, |b| b.height)
    }

    /// Whether `p` lies inside the entity.
    ///
    /// Circles use an exact distance test. Unrotated rectangles, images and
    /// video frames use a half-open box test; everything else ray-casts
    /// against the hull, so points on an edge may go either way.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        match &self.shape {
            Shape::Circle(c) => {
                let r = c.radius();
                let center = self.position + Point::new(r, r);
                (p.x - center.x).hypot(p.y - center.y) < r
            }
            shape if shape.is_box() && self.motion.rotation == 0.0 => {
                let area = Rect::new(self.position.x, self.position.y, shape.width(), shape.height());
                box_contains(area, p)
            }
            _ => hull_contains(&self.hull(), p),
        }
    }

    /// Whether any of `points` lies inside the entity.
    #[must_use]
    pub fn contains_any(&self, points: &[Point]) -> bool {
        points.iter().any(|p| self.contains_point(*p))
    }

    // ── Collision ───────────────────────────────────────────────

    /// Test for a collision with `other`, optionally pushing `self` out of it.
    ///
    /// Two entities collide when both are active and a hull vertex of either
    /// lies inside the other. Overlaps where no vertex is contained (two thin
    /// crossing bars) go undetected.
    ///
    /// With `reposition` set, `self` moves out along the axis of smaller
    /// overlap of the two hull bounds, leaving `padding` between them.
    ///
    /// `other` must not be `self`: callers holding both through
    /// [`EntityRef`]s borrow one mutably and the other shared.
    ///
    /// # Errors
    ///
    /// Rejects negative or non-finite padding.
    pub fn collide(&mut self, other: &Entity, options: CollideOptions) -> SceneResult<Collision> {
        options.validate()?;
        let call = self.collide_calls;
        self.collide_calls = self.collide_calls.wrapping_add(1);
        if call % (u64::from(options.skip) + 1) != 0 {
            return Ok(Collision::None);
        }
        if !self.active || !other.active {
            return Ok(Collision::None);
        }

        let mine = self.hull();
        let theirs = other.hull();
        if !other.contains_any(&mine) && !self.contains_any(&theirs) {
            return Ok(Collision::None);
        }
        if !options.reposition {
            return Ok(Collision::Contact);
        }

        let (Some(this_box), Some(other_box)) = (bounds(&mine), bounds(&theirs)) else {
            return Ok(Collision::Resolved(Direction::Indeterminate));
        };
        let (direction, shift) = resolve_overlap(this_box, other_box, options.padding + CONTACT_SLOP);
        self.position = self.position + shift;
        debug!(entity = %self.id, other = %other.id, ?direction, dx = shift.x, dy = shift.y, "collision resolved");
        Ok(Collision::Resolved(direction))
    }

    // ── Pointer capture ─────────────────────────────────────────

    /// Start following the pointer, keeping the current offset from it.
    ///
    /// Capturing an already captured entity keeps the original offset.
    pub fn capture(&mut self, input: &InputState) {
        if self.captured {
            return;
        }
        self.captured = true;
        self.capture_offset = self.position - input.pointer;
    }

    /// Stop following the pointer.
    pub fn release(&mut self) {
        self.captured = false;
        self.capture_offset = Point::zero();
    }

    // ── Frame update ────────────────────────────────────────────

    /// Draw (when visible) and then move the entity by one step of `dt`.
    ///
    /// A captured entity snaps to the pointer instead of integrating motion.
    /// Pass `dt = 1.0` for per-call motion or a wall-clock delta in seconds
    /// for frame-rate independent motion.
    ///
    /// # Errors
    ///
    /// Rejects a negative or non-finite `dt`; surface errors abort the update.
    pub fn update<S: Surface>(&mut self, canvas: &mut Canvas<S>, dt: f64) -> SceneResult<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SceneError::InvalidDeltaTime(dt));
        }

        if self.visible {
            if let Shape::Text(text) = &mut self.shape {
                text.remeasure(&canvas.surface);
            }
            render::draw_entity(&mut canvas.surface, self)?;
            if let Shape::Sprite(sprite) = &mut self.shape {
                sprite.advance();
            }
        }

        if self.captured {
            self.position = canvas.input.pointer + self.capture_offset;
        } else if self.auto_update {
            self.position = self.position + self.motion.displacement(dt);
            self.motion.advance_angles(dt);
        }
        Ok(())
    }
}
