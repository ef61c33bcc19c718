//! Rendering: issues one entity's draw calls to a [`Surface`].
//!
//! Every shape is drawn inside its own transform scope: the origin is moved
//! to the entity's centroid, rotated by the entity's rotation and faded to
//! its opacity, so the per-shape renderers below only deal with the unrotated
//! outline in centroid-relative coordinates.
//!
//! Nothing here mutates entity state. Sprite animation and text re-measuring
//! happen in [`crate::entity::Entity::update`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::entity::Entity;
use crate::error::SceneResult;
use crate::geom::{Point, Rect};
use crate::shape::{Circle, Paint, Shape, Sprite, Text};
use crate::surface::Surface;

/// Draw `entity` at its current position, rotation and opacity.
///
/// # Errors
///
/// Returns the first error the surface reports. The transform scope is left
/// open in that case; the frame is considered lost.
pub fn draw_entity<S: Surface + ?Sized>(surface: &mut S, entity: &Entity) -> SceneResult<()> {
    let centroid = entity.centroid();
    let origin = entity.position() + centroid;

    surface.begin_transform()?;
    surface.translate(origin.x, origin.y)?;
    surface.rotate(entity.motion().rotation().to_radians())?;
    surface.set_alpha(entity.opacity())?;
    draw_shape(surface, entity.shape(), centroid)?;
    surface.end_transform()
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape<S: Surface + ?Sized>(surface: &mut S, shape: &Shape, centroid: Point) -> SceneResult<()> {
    let top_left = Point::zero() - centroid;
    match shape {
        Shape::Circle(circle) => draw_circle(surface, circle),
        Shape::Rectangle(rect) => draw_outline(surface, &local_outline(shape, centroid), &rect.paint),
        Shape::Polygon(polygon) => draw_outline(surface, &local_outline(shape, centroid), &polygon.paint),
        Shape::Text(text) => draw_text(surface, text, top_left),
        Shape::Image(image) => {
            let size = image.image.size();
            let src = Rect::new(0.0, 0.0, size.width, size.height);
            let dst = Rect::new(top_left.x, top_left.y, size.width, size.height);
            surface.draw_image_region(image.image.key(), src, dst)
        }
        Shape::Sprite(sprite) => draw_sprite(surface, sprite, top_left),
        Shape::Video(video) => {
            let source = video.source.borrow();
            let size = source.frame_size();
            let src = Rect::new(0.0, 0.0, size.width, size.height);
            let dst = Rect::new(top_left.x, top_left.y, size.width, size.height);
            surface.draw_image_region(source.key(), src, dst)
        }
    }
}

fn local_outline(shape: &Shape, centroid: Point) -> Vec<Point> {
    shape.outline().into_iter().map(|p| p - centroid).collect()
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_circle<S: Surface + ?Sized>(surface: &mut S, circle: &Circle) -> SceneResult<()> {
    let center = Point::zero();
    if let Some(fill) = circle.paint.fill.as_deref() {
        surface.fill_circle(center, circle.radius(), fill)?;
    }
    if let Some(stroke) = circle.paint.visible_stroke() {
        surface.stroke_circle(center, circle.radius(), stroke, circle.paint.stroke_width)?;
    }
    Ok(())
}

fn draw_outline<S: Surface + ?Sized>(surface: &mut S, points: &[Point], paint: &Paint) -> SceneResult<()> {
    if points.is_empty() {
        return Ok(());
    }
    if let Some(fill) = paint.fill.as_deref() {
        surface.fill_polygon(points, fill)?;
    }
    if let Some(stroke) = paint.visible_stroke() {
        surface.stroke_polygon(points, stroke, paint.stroke_width)?;
    }
    Ok(())
}

fn draw_text<S: Surface + ?Sized>(surface: &mut S, text: &Text, at: Point) -> SceneResult<()> {
    if let Some(fill) = text.paint.fill.as_deref() {
        surface.fill_text(text.content(), at, text.font(), fill)?;
    }
    if let Some(stroke) = text.paint.visible_stroke() {
        surface.stroke_text(text.content(), at, text.font(), stroke, text.paint.stroke_width)?;
    }
    Ok(())
}

/// Blit the current cell: column `frame`, row `strip`.
fn draw_sprite<S: Surface + ?Sized>(surface: &mut S, sprite: &Sprite, at: Point) -> SceneResult<()> {
    let cell = sprite.cell_size();
    let src = Rect::new(
        f64::from(sprite.frame()) * cell.width,
        f64::from(sprite.strip()) * cell.height,
        cell.width,
        cell.height,
    );
    let dst = Rect::new(at.x, at.y, cell.width, cell.height);
    surface.draw_image_region(sprite.sheet().key(), src, dst)
}
