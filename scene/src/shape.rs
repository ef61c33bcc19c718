//! Concrete shape variants and their intrinsic geometry.
//!
//! A shape knows its own width, height, centroid and unrotated outline in
//! local coordinates (relative to the owning entity's position). Placement,
//! rotation and motion belong to [`crate::entity::Entity`].

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::cell::RefCell;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::{CIRCLE_HULL_SEGMENTS, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::error::{SceneError, SceneResult, finite, non_negative};
use crate::geom::{Point, Size, bounds};
use crate::surface::TextMeasure;

/// Fill and stroke colors as CSS color strings.
///
/// The stroke is only drawn when `stroke_width` is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Self { fill: Some("black".to_owned()), stroke: Some("black".to_owned()), stroke_width: 0.0 }
    }
}

impl Paint {
    /// Stroke color, when a stroke should be drawn at all.
    #[must_use]
    pub fn visible_stroke(&self) -> Option<&str> {
        match self.stroke.as_deref() {
            Some(color) if self.stroke_width > 0.0 => Some(color),
            _ => None,
        }
    }
}

/// Font used by text entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    size: f64,
    family: String,
}

impl Default for Font {
    fn default() -> Self {
        Self { size: DEFAULT_FONT_SIZE, family: DEFAULT_FONT_FAMILY.to_owned() }
    }
}

impl Font {
    /// # Errors
    ///
    /// Rejects a negative or non-finite size.
    pub fn new(size: f64, family: impl Into<String>) -> SceneResult<Self> {
        Ok(Self { size: non_negative("font size", size)?, family: family.into() })
    }

    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// CSS shorthand, e.g. `16px sans-serif`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

/// An image the drawing surface can resolve by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    key: String,
    size: Size,
}

impl ImageRef {
    /// # Errors
    ///
    /// Rejects negative or non-finite dimensions.
    pub fn new(key: impl Into<String>, width: f64, height: f64) -> SceneResult<Self> {
        let size = Size::new(non_negative("image width", width)?, non_negative("image height", height)?);
        Ok(Self { key: key.into(), size })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }
}

/// A live video whose current frame can be drawn.
pub trait VideoSource {
    /// Key the drawing surface uses to resolve the video element.
    fn key(&self) -> &str;
    /// Intrinsic size of the current video frame.
    fn frame_size(&self) -> Size;
}

/// Shared handle to a video source.
pub type VideoRef = Rc<RefCell<dyn VideoSource>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    radius: f64,
    pub paint: Paint,
}

impl Circle {
    /// # Errors
    ///
    /// Rejects a negative or non-finite radius.
    pub fn new(radius: f64) -> SceneResult<Self> {
        Ok(Self { radius: non_negative("radius", radius)?, paint: Paint::default() })
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// # Errors
    ///
    /// Rejects a negative or non-finite radius.
    pub fn set_radius(&mut self, radius: f64) -> SceneResult<()> {
        self.radius = non_negative("radius", radius)?;
        Ok(())
    }

    /// Regular polygon approximating the circumference, starting at the
    /// leftmost point and running clockwise on screen.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn outline(&self) -> Vec<Point> {
        let r = self.radius;
        (0..CIRCLE_HULL_SEGMENTS)
            .map(|i| {
                let theta = TAU * i as f64 / CIRCLE_HULL_SEGMENTS as f64 + PI;
                Point::new(r + r * theta.cos(), r + r * theta.sin())
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    width: f64,
    height: f64,
    pub paint: Paint,
}

impl Rectangle {
    /// # Errors
    ///
    /// Rejects negative or non-finite dimensions.
    pub fn new(width: f64, height: f64) -> SceneResult<Self> {
        Ok(Self {
            width: non_negative("width", width)?,
            height: non_negative("height", height)?,
            paint: Paint::default(),
        })
    }

    /// # Errors
    ///
    /// Rejects negative or non-finite dimensions.
    pub fn set_size(&mut self, width: f64, height: f64) -> SceneResult<()> {
        let width = non_negative("width", width)?;
        self.height = non_negative("height", height)?;
        self.width = width;
        Ok(())
    }
}

/// Free-form polygon.
///
/// With anchor adjustment on, vertices are translated so their minimum x and
/// y are zero, putting the polygon flush against the entity position. The
/// translation is accumulated in `adjust_offset` so it can be undone.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    anchor_adjust: bool,
    adjust_offset: Point,
    pub paint: Paint,
}

impl Polygon {
    /// # Errors
    ///
    /// Rejects any non-finite vertex coordinate.
    pub fn new(vertices: Vec<Point>, anchor_adjust: bool) -> SceneResult<Self> {
        let mut polygon = Self {
            vertices: Vec::new(),
            anchor_adjust,
            adjust_offset: Point::zero(),
            paint: Paint::default(),
        };
        polygon.set_vertices(vertices)?;
        Ok(polygon)
    }

    /// Vertices as stored (anchor-adjusted when adjustment is on).
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Vertices in the coordinates they were supplied in.
    #[must_use]
    pub fn raw_vertices(&self) -> Vec<Point> {
        self.vertices.iter().map(|v| *v + self.adjust_offset).collect()
    }

    #[must_use]
    pub fn anchor_adjust(&self) -> bool {
        self.anchor_adjust
    }

    #[must_use]
    pub fn adjust_offset(&self) -> Point {
        self.adjust_offset
    }

    /// Replace the vertex list, re-applying anchor adjustment if it is on.
    ///
    /// # Errors
    ///
    /// Rejects any non-finite vertex coordinate; the polygon is left unchanged.
    pub fn set_vertices(&mut self, vertices: Vec<Point>) -> SceneResult<()> {
        for v in &vertices {
            finite("vertex x", v.x)?;
            finite("vertex y", v.y)?;
        }
        self.vertices = vertices;
        self.adjust_offset = Point::zero();
        if self.anchor_adjust {
            self.anchor();
        }
        Ok(())
    }

    /// Toggle anchor adjustment. Turning it off restores the raw vertices.
    pub fn set_anchor_adjust(&mut self, on: bool) {
        if on == self.anchor_adjust {
            return;
        }
        self.anchor_adjust = on;
        if on {
            self.anchor();
        } else {
            let offset = self.adjust_offset;
            for v in &mut self.vertices {
                *v = *v + offset;
            }
            self.adjust_offset = Point::zero();
        }
    }

    /// Translate vertices so the minimum x/y is zero. Re-applying is a no-op.
    fn anchor(&mut self) {
        let Some(b) = bounds(&self.vertices) else {
            return;
        };
        let shift = Point::new(b.x, b.y);
        for v in &mut self.vertices {
            *v = *v - shift;
        }
        self.adjust_offset = self.adjust_offset + shift;
    }

    /// Area-weighted centroid of the vertex ring.
    ///
    /// Zero-area rings fall back to the vertex mean; an empty ring has no
    /// centroid and yields NaN coordinates.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Point {
        let n = self.vertices.len();
        if n == 0 {
            return Point::new(f64::NAN, f64::NAN);
        }
        let mut area2 = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            area2 += cross;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        if area2.abs() <= f64::EPSILON {
            let sum = self.vertices.iter().fold(Point::zero(), |acc, v| acc + *v);
            return Point::new(sum.x / n as f64, sum.y / n as f64);
        }
        Point::new(cx / (3.0 * area2), cy / (3.0 * area2))
    }

    fn extents(&self) -> Size {
        bounds(&self.vertices).map_or_else(Size::default, |b| Size::new(b.width, b.height))
    }
}

/// A single line of text drawn from its top-left corner.
///
/// Width comes from the surface's text metrics; it is measured on creation,
/// whenever content or font change, and again each time the text is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    content: String,
    font: Font,
    measured_width: f64,
    pub paint: Paint,
}

impl Text {
    #[must_use]
    pub fn new(content: impl Into<String>, font: Font, measure: &dyn TextMeasure) -> Self {
        let mut text = Self { content: content.into(), font, measured_width: 0.0, paint: Paint::default() };
        text.remeasure(measure);
        text
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_content(&mut self, content: impl Into<String>, measure: &dyn TextMeasure) {
        self.content = content.into();
        self.remeasure(measure);
    }

    pub fn set_font(&mut self, font: Font, measure: &dyn TextMeasure) {
        self.font = font;
        self.remeasure(measure);
    }

    /// Refresh the cached width. Non-finite metrics are treated as zero width.
    pub fn remeasure(&mut self, measure: &dyn TextMeasure) {
        let width = measure.measure_text_width(&self.content, &self.font);
        self.measured_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub image: ImageRef,
}

/// Animated sprite sheet: `frames` columns by `strips` rows of equal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    sheet: ImageRef,
    frames: u32,
    strips: u32,
    ticks_per_frame: u32,
    counter: u64,
    frame: u32,
    strip: u32,
    /// Whether the frame index advances on each draw.
    pub animated: bool,
}

impl Sprite {
    /// # Errors
    ///
    /// `frames`, `strips` and `ticks_per_frame` must all be at least 1.
    pub fn new(sheet: ImageRef, frames: u32, ticks_per_frame: u32, strips: u32) -> SceneResult<Self> {
        at_least_one("frames", frames)?;
        at_least_one("ticks per frame", ticks_per_frame)?;
        at_least_one("strips", strips)?;
        Ok(Self { sheet, frames, strips, ticks_per_frame, counter: 0, frame: 0, strip: 0, animated: true })
    }

    #[must_use]
    pub fn sheet(&self) -> &ImageRef {
        &self.sheet
    }

    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    #[must_use]
    pub fn strips(&self) -> u32 {
        self.strips
    }

    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[must_use]
    pub fn strip(&self) -> u32 {
        self.strip
    }

    /// Jump to a frame column.
    ///
    /// # Errors
    ///
    /// Rejects an index past the last frame.
    pub fn set_frame(&mut self, frame: u32) -> SceneResult<()> {
        self.frame = below("frame", frame, self.frames)?;
        Ok(())
    }

    /// Select the row (animation strip) to play.
    ///
    /// # Errors
    ///
    /// Rejects an index past the last strip.
    pub fn set_strip(&mut self, strip: u32) -> SceneResult<()> {
        self.strip = below("strip", strip, self.strips)?;
        Ok(())
    }

    #[must_use]
    pub fn cell_size(&self) -> Size {
        let sheet = self.sheet.size();
        Size::new(sheet.width / f64::from(self.frames), sheet.height / f64::from(self.strips))
    }

    /// Advance the animation by one drawn frame.
    ///
    /// A stopped sprite still runs to the end of its current cycle.
    pub fn advance(&mut self) {
        if !self.animated && self.frame == 0 {
            return;
        }
        if self.counter % u64::from(self.ticks_per_frame) == 0 {
            self.frame += 1;
            if self.frame >= self.frames {
                self.frame = 0;
            }
        }
        self.counter += 1;
    }
}

fn at_least_one(field: &'static str, value: u32) -> SceneResult<()> {
    if value == 0 {
        return Err(SceneError::OutOfRange { field, value: 0.0, expected: ">= 1" });
    }
    Ok(())
}

fn below(field: &'static str, value: u32, limit: u32) -> SceneResult<u32> {
    if value >= limit {
        return Err(SceneError::OutOfRange { field, value: f64::from(value), expected: "below the cell count" });
    }
    Ok(value)
}

/// The current frame of a video source.
#[derive(Clone)]
pub struct Video {
    pub source: VideoRef,
}

impl Video {
    #[must_use]
    pub fn frame_size(&self) -> Size {
        self.source.borrow().frame_size()
    }
}

impl fmt::Debug for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.source.borrow();
        f.debug_struct("Video")
            .field("key", &source.key())
            .field("frame_size", &source.frame_size())
            .finish()
    }
}

/// The closed set of drawable shapes.
#[derive(Debug, Clone)]
pub enum Shape {
    Circle(Circle),
    Rectangle(Rectangle),
    Polygon(Polygon),
    Text(Text),
    Image(Image),
    Sprite(Sprite),
    Video(Video),
}

impl Shape {
    /// Width of the smallest axis-aligned box around the unrotated shape.
    #[must_use]
    pub fn width(&self) -> f64 {
        match self {
            Self::Circle(c) => c.radius * 2.0,
            Self::Rectangle(r) => r.width,
            Self::Polygon(p) => p.extents().width,
            Self::Text(t) => t.measured_width,
            Self::Image(i) => i.image.size.width,
            Self::Sprite(s) => s.cell_size().width,
            Self::Video(v) => v.frame_size().width,
        }
    }

    /// Height of the smallest axis-aligned box around the unrotated shape.
    #[must_use]
    pub fn height(&self) -> f64 {
        match self {
            Self::Circle(c) => c.radius * 2.0,
            Self::Rectangle(r) => r.height,
            Self::Polygon(p) => p.extents().height,
            Self::Text(t) => t.font.size,
            Self::Image(i) => i.image.size.height,
            Self::Sprite(s) => s.cell_size().height,
            Self::Video(v) => v.frame_size().height,
        }
    }

    /// Rotation pivot in local coordinates.
    #[must_use]
    pub fn centroid(&self) -> Point {
        match self {
            Self::Polygon(p) => p.centroid(),
            _ => Point::new(self.width() * 0.5, self.height() * 0.5),
        }
    }

    /// Unrotated outline in local coordinates.
    #[must_use]
    pub fn outline(&self) -> Vec<Point> {
        match self {
            Self::Circle(c) => c.outline(),
            Self::Polygon(p) => p.vertices.clone(),
            _ => {
                let (w, h) = (self.width(), self.height());
                vec![Point::zero(), Point::new(w, 0.0), Point::new(w, h), Point::new(0.0, h)]
            }
        }
    }

    /// Whether the unrotated shape can use the direct box containment test.
    #[must_use]
    pub fn is_box(&self) -> bool {
        matches!(self, Self::Rectangle(_) | Self::Image(_) | Self::Video(_))
    }

    /// Short lowercase name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Circle(_) => "circle",
            Self::Rectangle(_) => "rectangle",
            Self::Polygon(_) => "polygon",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Sprite(_) => "sprite",
            Self::Video(_) => "video",
        }
    }

    /// Fill/stroke settings, for the variants that have them.
    #[must_use]
    pub fn paint_mut(&mut self) -> Option<&mut Paint> {
        match self {
            Self::Circle(c) => Some(&mut c.paint),
            Self::Rectangle(r) => Some(&mut r.paint),
            Self::Polygon(p) => Some(&mut p.paint),
            Self::Text(t) => Some(&mut t.paint),
            Self::Image(_) | Self::Sprite(_) | Self::Video(_) => None,
        }
    }
}
