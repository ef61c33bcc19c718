//! Browser backend: a [`Surface`] over an HTML canvas and media backends
//! over `<audio>`/`<video>` elements.
//!
//! All fallible `Canvas2D` calls propagate as [`SceneError::Surface`].

use std::collections::HashMap;

use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, HtmlAudioElement, HtmlCanvasElement, HtmlImageElement, HtmlMediaElement,
    HtmlVideoElement,
};

use crate::error::{SceneError, SceneResult};
use crate::geom::{Point, Rect, Size};
use crate::media::{MediaBackend, VideoBackend};
use crate::shape::Font;
use crate::surface::{Surface, TextMeasure};

/// Milliseconds since the epoch, suitable as a draw timestamp.
#[must_use]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn js_error(err: JsValue) -> SceneError {
    SceneError::Surface(format!("{err:?}"))
}

// =============================================================
// Surface
// =============================================================

/// Canvas element plus its 2D context and the images/videos it can blit.
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
    videos: HashMap<String, HtmlVideoElement>,
}

impl WebSurface {
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx, images: HashMap::new(), videos: HashMap::new() }
    }

    /// Wrap `canvas`, acquiring its 2D context.
    ///
    /// # Errors
    ///
    /// Fails when the canvas has no 2D context.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> SceneResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| SceneError::Surface("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|obj| js_error(obj.into()))?;
        Ok(Self::new(canvas, ctx))
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[must_use]
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Make `image` drawable under `key`, replacing any previous one.
    pub fn register_image(&mut self, key: impl Into<String>, image: HtmlImageElement) {
        self.images.insert(key.into(), image);
    }

    pub fn register_video(&mut self, key: impl Into<String>, video: HtmlVideoElement) {
        self.videos.insert(key.into(), video);
    }

    fn trace_path(&self, points: &[Point]) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x, p.y);
            } else {
                self.ctx.line_to(p.x, p.y);
            }
        }
        self.ctx.close_path();
    }

    fn trace_circle(&self, center: Point, radius: f64) -> SceneResult<()> {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .map_err(js_error)
    }

    fn apply_font(&self, font: &Font) {
        self.ctx.set_font(&font.css());
        self.ctx.set_text_baseline("top");
    }
}

impl TextMeasure for WebSurface {
    fn measure_text_width(&self, text: &str, font: &Font) -> f64 {
        self.ctx.set_font(&font.css());
        match self.ctx.measure_text(text) {
            Ok(m) => m.width(),
            Err(_) => f64::NAN,
        }
    }
}

impl Surface for WebSurface {
    fn begin_transform(&mut self) -> SceneResult<()> {
        self.ctx.save();
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> SceneResult<()> {
        self.ctx.translate(dx, dy).map_err(js_error)
    }

    fn rotate(&mut self, radians: f64) -> SceneResult<()> {
        self.ctx.rotate(radians).map_err(js_error)
    }

    fn set_alpha(&mut self, alpha: f64) -> SceneResult<()> {
        self.ctx.set_global_alpha(alpha);
        Ok(())
    }

    fn end_transform(&mut self) -> SceneResult<()> {
        self.ctx.restore();
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: &str) -> SceneResult<()> {
        self.trace_path(points);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        Ok(())
    }

    fn stroke_polygon(&mut self, points: &[Point], color: &str, width: f64) -> SceneResult<()> {
        self.trace_path(points);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> SceneResult<()> {
        self.trace_circle(center, radius)?;
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        Ok(())
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) -> SceneResult<()> {
        self.trace_circle(center, radius)?;
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &Font, color: &str) -> SceneResult<()> {
        self.apply_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, at.x, at.y).map_err(js_error)
    }

    fn stroke_text(&mut self, text: &str, at: Point, font: &Font, color: &str, width: f64) -> SceneResult<()> {
        self.apply_font(font);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke_text(text, at.x, at.y).map_err(js_error)
    }

    fn draw_image_region(&mut self, key: &str, src: Rect, dst: Rect) -> SceneResult<()> {
        if let Some(image) = self.images.get(key) {
            return self
                .ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    image, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
                )
                .map_err(js_error);
        }
        if let Some(video) = self.videos.get(key) {
            return self
                .ctx
                .draw_image_with_html_video_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    video, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
                )
                .map_err(js_error);
        }
        Err(SceneError::Surface(format!("no image or video registered as {key:?}")))
    }

    fn clear(&mut self) -> SceneResult<()> {
        let size = self.backing_size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
        Ok(())
    }

    fn cursor(&self) -> String {
        match self.canvas.style().get_property_value("cursor") {
            Ok(cursor) => cursor,
            Err(_) => String::new(),
        }
    }

    fn set_cursor(&mut self, cursor: &str) -> SceneResult<()> {
        self.canvas.style().set_property("cursor", cursor).map_err(js_error)
    }

    fn display_size(&self) -> Size {
        Size::new(f64::from(self.canvas.client_width()), f64::from(self.canvas.client_height()))
    }

    fn backing_size(&self) -> Size {
        Size::new(f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }
}

// =============================================================
// Media
// =============================================================

/// Any HTML media element.
pub struct WebMedia {
    element: HtmlMediaElement,
}

impl WebMedia {
    #[must_use]
    pub fn new(element: HtmlMediaElement) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn audio(element: HtmlAudioElement) -> Self {
        Self::new(element.into())
    }

    #[must_use]
    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }
}

impl MediaBackend for WebMedia {
    fn play(&mut self) -> SceneResult<()> {
        self.element.play().map(drop).map_err(js_error)
    }

    fn pause(&mut self) {
        if let Err(err) = self.element.pause() {
            warn!(?err, "media: pause failed");
        }
    }

    fn position(&self) -> f64 {
        self.element.current_time()
    }

    fn set_position(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.element.duration()
    }

    fn volume(&self) -> f64 {
        self.element.volume()
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }

    fn source(&self) -> String {
        self.element.src()
    }

    fn set_source(&mut self, source: &str) {
        self.element.set_src(source);
    }
}

/// A `<video>` element, drawn through the [`WebSurface`] it is registered
/// with under `key`.
pub struct WebVideo {
    media: WebMedia,
    video: HtmlVideoElement,
    key: String,
}

impl WebVideo {
    #[must_use]
    pub fn new(key: impl Into<String>, video: HtmlVideoElement) -> Self {
        let media = WebMedia::new(video.clone().into());
        Self { media, video, key: key.into() }
    }

    /// Register the element with `surface` under this video's key.
    pub fn register(&self, surface: &mut WebSurface) {
        surface.register_video(self.key.clone(), self.video.clone());
    }
}

impl MediaBackend for WebVideo {
    fn play(&mut self) -> SceneResult<()> {
        self.media.play()
    }

    fn pause(&mut self) {
        self.media.pause();
    }

    fn position(&self) -> f64 {
        self.media.position()
    }

    fn set_position(&mut self, seconds: f64) {
        self.media.set_position(seconds);
    }

    fn duration(&self) -> f64 {
        self.media.duration()
    }

    fn volume(&self) -> f64 {
        self.media.volume()
    }

    fn set_volume(&mut self, volume: f64) {
        self.media.set_volume(volume);
    }

    fn source(&self) -> String {
        self.media.source()
    }

    fn set_source(&mut self, source: &str) {
        self.media.set_source(source);
    }
}

impl VideoBackend for WebVideo {
    fn key(&self) -> &str {
        &self.key
    }

    fn video_size(&self) -> Size {
        Size::new(f64::from(self.video.video_width()), f64::from(self.video.video_height()))
    }

    fn display_size(&self) -> Size {
        Size::new(f64::from(self.video.client_width()), f64::from(self.video.client_height()))
    }
}
