//! Drawing surface contract and a headless recording implementation.
//!
//! The scene never talks to a concrete rendering backend. Everything it needs
//! from one is on [`Surface`]: a save/restore transform scope, a handful of
//! fill/stroke primitives, image blits, text metrics and the two size queries
//! used to scale pointer coordinates.
//!
//! Fallible calls return [`SceneResult`] so that a backend error aborts the
//! frame instead of being swallowed.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::error::SceneResult;
use crate::geom::{Point, Rect, Size};
use crate::shape::Font;

/// Text metrics, separate from [`Surface`] so shapes can be measured
/// before any surface is drawing.
pub trait TextMeasure {
    /// Rendered width of `text` in `font`, in surface pixels.
    fn measure_text_width(&self, text: &str, font: &Font) -> f64;
}

/// A 2D drawing target.
pub trait Surface: TextMeasure {
    /// Open a transform scope (save the current transform and alpha).
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn begin_transform(&mut self) -> SceneResult<()>;

    /// # Errors
    ///
    /// Backend-specific failures.
    fn translate(&mut self, dx: f64, dy: f64) -> SceneResult<()>;

    /// Rotate the current transform clockwise by `radians`.
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn rotate(&mut self, radians: f64) -> SceneResult<()>;

    /// # Errors
    ///
    /// Backend-specific failures.
    fn set_alpha(&mut self, alpha: f64) -> SceneResult<()>;

    /// Close the innermost transform scope.
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn end_transform(&mut self) -> SceneResult<()>;

    /// # Errors
    ///
    /// Backend-specific failures.
    fn fill_polygon(&mut self, points: &[Point], color: &str) -> SceneResult<()>;

    /// # Errors
    ///
    /// Backend-specific failures.
    fn stroke_polygon(&mut self, points: &[Point], color: &str, width: f64) -> SceneResult<()>;

    /// # Errors
    ///
    /// Backend-specific failures.
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> SceneResult<()>;

    /// # Errors
    ///
    /// Backend-specific failures.
    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) -> SceneResult<()>;

    /// Fill `text` with its top-left corner at `at`.
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn fill_text(&mut self, text: &str, at: Point, font: &Font, color: &str) -> SceneResult<()>;

    /// # Errors
    ///
    /// Backend-specific failures.
    fn stroke_text(&mut self, text: &str, at: Point, font: &Font, color: &str, width: f64) -> SceneResult<()>;

    /// Copy the `src` region of the image (or video) named `key` into `dst`.
    ///
    /// # Errors
    ///
    /// Backend-specific failures, including an unknown key.
    fn draw_image_region(&mut self, key: &str, src: Rect, dst: Rect) -> SceneResult<()>;

    /// Erase the whole surface.
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn clear(&mut self) -> SceneResult<()>;

    /// CSS cursor shown over the surface; empty when none was set.
    fn cursor(&self) -> String;

    /// Change the cursor shown over the surface (`"grab"`, `"crosshair"`, ...).
    ///
    /// # Errors
    ///
    /// Backend-specific failures.
    fn set_cursor(&mut self, cursor: &str) -> SceneResult<()>;

    /// Size the surface is displayed at on screen.
    fn display_size(&self) -> Size;

    /// Size of the backing pixel buffer.
    fn backing_size(&self) -> Size;
}

/// One call recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginTransform,
    Translate { dx: f64, dy: f64 },
    Rotate { radians: f64 },
    SetAlpha(f64),
    EndTransform,
    FillPolygon { points: Vec<Point>, color: String },
    StrokePolygon { points: Vec<Point>, color: String, width: f64 },
    FillCircle { center: Point, radius: f64, color: String },
    StrokeCircle { center: Point, radius: f64, color: String, width: f64 },
    FillText { text: String, at: Point, font: String, color: String },
    StrokeText { text: String, at: Point, font: String, color: String, width: f64 },
    DrawImage { key: String, src: Rect, dst: Rect },
    Clear,
}

/// Headless surface that records every call.
///
/// Text is measured as a fixed-pitch font: half the font size per character.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    display: Size,
    backing: Size,
    cursor: String,
}

impl RecordingSurface {
    /// A surface displayed at the same size as its backing buffer.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_display(Size::new(width, height), Size::new(width, height))
    }

    #[must_use]
    pub fn with_display(backing: Size, display: Size) -> Self {
        Self { ops: Vec::new(), display, backing, cursor: String::new() }
    }

    /// Change the on-screen size, e.g. after a layout change.
    pub fn set_display_size(&mut self, display: Size) {
        self.display = display;
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded calls.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl TextMeasure for RecordingSurface {
    #[allow(clippy::cast_precision_loss)]
    fn measure_text_width(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * font.size() * 0.5
    }
}

impl Surface for RecordingSurface {
    fn begin_transform(&mut self) -> SceneResult<()> {
        self.ops.push(DrawOp::BeginTransform);
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> SceneResult<()> {
        self.ops.push(DrawOp::Translate { dx, dy });
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> SceneResult<()> {
        self.ops.push(DrawOp::Rotate { radians });
        Ok(())
    }

    fn set_alpha(&mut self, alpha: f64) -> SceneResult<()> {
        self.ops.push(DrawOp::SetAlpha(alpha));
        Ok(())
    }

    fn end_transform(&mut self) -> SceneResult<()> {
        self.ops.push(DrawOp::EndTransform);
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: &str) -> SceneResult<()> {
        self.ops.push(DrawOp::FillPolygon { points: points.to_vec(), color: color.to_owned() });
        Ok(())
    }

    fn stroke_polygon(&mut self, points: &[Point], color: &str, width: f64) -> SceneResult<()> {
        self.ops.push(DrawOp::StrokePolygon { points: points.to_vec(), color: color.to_owned(), width });
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> SceneResult<()> {
        self.ops.push(DrawOp::FillCircle { center, radius, color: color.to_owned() });
        Ok(())
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) -> SceneResult<()> {
        self.ops.push(DrawOp::StrokeCircle { center, radius, color: color.to_owned(), width });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &Font, color: &str) -> SceneResult<()> {
        self.ops.push(DrawOp::FillText { text: text.to_owned(), at, font: font.css(), color: color.to_owned() });
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, at: Point, font: &Font, color: &str, width: f64) -> SceneResult<()> {
        self.ops.push(DrawOp::StrokeText {
            text: text.to_owned(),
            at,
            font: font.css(),
            color: color.to_owned(),
            width,
        });
        Ok(())
    }

    fn draw_image_region(&mut self, key: &str, src: Rect, dst: Rect) -> SceneResult<()> {
        self.ops.push(DrawOp::DrawImage { key: key.to_owned(), src, dst });
        Ok(())
    }

    fn clear(&mut self) -> SceneResult<()> {
        self.ops.push(DrawOp::Clear);
        Ok(())
    }

    fn cursor(&self) -> String {
        self.cursor.clone()
    }

    fn set_cursor(&mut self, cursor: &str) -> SceneResult<()> {
        self.cursor = cursor.to_owned();
        Ok(())
    }

    fn display_size(&self) -> Size {
        self.display
    }

    fn backing_size(&self) -> Size {
        self.backing
    }
}
