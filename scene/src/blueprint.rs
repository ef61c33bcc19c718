//! JSON scene descriptions.
//!
//! A blueprint lists entities with their shape, placement, draw order, motion
//! dials, flags and paint, plus optional frame timing. Building one runs every
//! value through the same validated constructors and setters as hand-written
//! code, so a blueprint can never produce an entity that code could not.
//!
//! ```json
//! {
//!   "config": { "max_delta": 0.05 },
//!   "entities": [
//!     { "name": "ball", "x": 10, "y": 0, "order": 1,
//!       "shape": { "kind": "circle", "radius": 8 },
//!       "motion": { "gravity": 120 } },
//!     { "name": "floor", "x": 0, "y": 200,
//!       "shape": { "kind": "rectangle", "width": 320, "height": 16 },
//!       "paint": { "fill": "#333" } }
//!   ]
//! }
//! ```
//!
//! Video entities are not describable: they need a live source.

#[cfg(test)]
#[path = "blueprint_test.rs"]
mod blueprint_test;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SceneConfig;
use crate::entity::{Entity, EntityRef};
use crate::error::{SceneError, SceneResult};
use crate::geom::Point;
use crate::shape::{Circle, Font, Image, ImageRef, Paint, Polygon, Rectangle, Shape, Sprite, Text};
use crate::surface::TextMeasure;

/// A whole scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneBlueprint {
    #[serde(default)]
    pub config: Option<SceneConfig>,
    #[serde(default)]
    pub entities: Vec<EntityBlueprint>,
}

/// One entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct EntityBlueprint {
    /// Label used in reports.
    #[serde(default)]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Draw order in the scene's root layer.
    #[serde(default)]
    pub order: i64,
    pub shape: ShapeBlueprint,
    #[serde(default)]
    pub motion: MotionBlueprint,
    #[serde(default)]
    pub paint: Option<Paint>,
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default = "yes")]
    pub active: bool,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default = "yes")]
    pub auto_update: bool,
}

/// Shape parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeBlueprint {
    Circle {
        radius: f64,
    },
    Rectangle {
        width: f64,
        height: f64,
    },
    Polygon {
        vertices: Vec<Point>,
        #[serde(default)]
        anchor_adjust: bool,
    },
    Text {
        content: String,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        font_family: Option<String>,
    },
    Image {
        key: String,
        width: f64,
        height: f64,
    },
    Sprite {
        key: String,
        /// Size of the whole sheet.
        width: f64,
        height: f64,
        frames: u32,
        #[serde(default = "one_u32")]
        ticks_per_frame: u32,
        #[serde(default = "one_u32")]
        strips: u32,
        #[serde(default = "yes")]
        animated: bool,
    },
}

/// Motion dials. `friction` is the resistance in `[0, 1]` (0 is frictionless).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionBlueprint {
    pub delta_x: f64,
    pub delta_y: f64,
    pub velocity: f64,
    pub friction: f64,
    pub rotation: f64,
    pub delta_rotation: f64,
    pub gravity: f64,
    pub gravity_angle: f64,
    pub delta_gravity: f64,
}

/// A built entity with its blueprint label and order.
#[derive(Debug, Clone)]
pub struct PlacedEntity {
    pub name: Option<String>,
    pub order: i64,
    pub entity: EntityRef,
}

fn one() -> f64 {
    1.0
}

fn one_u32() -> u32 {
    1
}

fn yes() -> bool {
    true
}

impl SceneBlueprint {
    /// # Errors
    ///
    /// Returns [`SceneError::Blueprint`] for malformed JSON.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The blueprint's own timing, or `fallback` when it has none.
    ///
    /// # Errors
    ///
    /// Rejects negative or non-finite steps.
    pub fn config_or(&self, fallback: SceneConfig) -> SceneResult<SceneConfig> {
        let config = self.config.unwrap_or(fallback);
        config.validate().map_err(|err| SceneError::Blueprint(format!("config: {err}")))?;
        Ok(config)
    }

    /// Build every entity, in blueprint order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Blueprint`] naming the first invalid entity.
    pub fn build(&self, measure: &dyn TextMeasure) -> SceneResult<Vec<PlacedEntity>> {
        let placed = self
            .entities
            .iter()
            .enumerate()
            .map(|(index, bp)| {
                let entity = bp.build(measure).map_err(|err| {
                    let label = bp.name.clone().unwrap_or_else(|| format!("#{index}"));
                    SceneError::Blueprint(format!("entity {label}: {err}"))
                })?;
                Ok(PlacedEntity { name: bp.name.clone(), order: bp.order, entity: entity.into_ref() })
            })
            .collect::<SceneResult<Vec<_>>>()?;
        info!(count = placed.len(), "scene blueprint built");
        Ok(placed)
    }
}

impl EntityBlueprint {
    /// # Errors
    ///
    /// Any validation error from the shape constructor or a motion setter.
    pub fn build(&self, measure: &dyn TextMeasure) -> SceneResult<Entity> {
        let mut entity = Entity::new(self.x, self.y, self.shape.build(measure)?)?;
        if let Some(paint) = &self.paint {
            entity = entity.with_paint(paint.clone());
        }
        entity.set_opacity(self.opacity)?;
        entity.active = self.active;
        entity.visible = self.visible;
        entity.auto_update = self.auto_update;

        let m = &self.motion;
        let motion = entity.motion_mut();
        motion.set_delta(m.delta_x, m.delta_y)?;
        motion.set_velocity(m.velocity)?;
        motion.set_friction(m.friction)?;
        motion.set_rotation(m.rotation)?;
        motion.set_delta_rotation(m.delta_rotation)?;
        motion.set_gravity(m.gravity)?;
        motion.set_gravity_angle(m.gravity_angle)?;
        motion.set_delta_gravity(m.delta_gravity)?;
        Ok(entity)
    }
}

impl ShapeBlueprint {
    fn build(&self, measure: &dyn TextMeasure) -> SceneResult<Shape> {
        let shape = match self {
            Self::Circle { radius } => Shape::Circle(Circle::new(*radius)?),
            Self::Rectangle { width, height } => Shape::Rectangle(Rectangle::new(*width, *height)?),
            Self::Polygon { vertices, anchor_adjust } => {
                Shape::Polygon(Polygon::new(vertices.clone(), *anchor_adjust)?)
            }
            Self::Text { content, font_size, font_family } => {
                let default = Font::default();
                let font = Font::new(
                    font_size.unwrap_or(default.size()),
                    font_family.clone().unwrap_or_else(|| default.family().to_owned()),
                )?;
                Shape::Text(Text::new(content.as_str(), font, measure))
            }
            Self::Image { key, width, height } => {
                Shape::Image(Image { image: ImageRef::new(key.as_str(), *width, *height)? })
            }
            Self::Sprite { key, width, height, frames, ticks_per_frame, strips, animated } => {
                let sheet = ImageRef::new(key.as_str(), *width, *height)?;
                let mut sprite = Sprite::new(sheet, *frames, *ticks_per_frame, *strips)?;
                sprite.animated = *animated;
                Shape::Sprite(sprite)
            }
        };
        Ok(shape)
    }
}
