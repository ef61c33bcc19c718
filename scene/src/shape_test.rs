#![allow(clippy::float_cmp)]

use super::*;
use crate::surface::RecordingSurface;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn square(x0: f64, y0: f64, side: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x0 + side, y0),
        Point::new(x0 + side, y0 + side),
        Point::new(x0, y0 + side),
    ]
}

// =============================================================
// Paint / Font / ImageRef
// =============================================================

#[test]
fn paint_default_hides_stroke() {
    let paint = Paint::default();
    assert_eq!(paint.fill.as_deref(), Some("black"));
    assert_eq!(paint.visible_stroke(), None);
}

#[test]
fn paint_stroke_visible_with_width() {
    let paint = Paint { stroke_width: 2.0, stroke: Some("red".into()), ..Paint::default() };
    assert_eq!(paint.visible_stroke(), Some("red"));
}

#[test]
fn font_default_and_css() {
    let font = Font::default();
    assert_eq!(font.size(), 16.0);
    assert_eq!(font.css(), "16px sans-serif");
}

#[test]
fn font_rejects_negative_size() {
    assert!(Font::new(-1.0, "serif").is_err());
    assert!(Font::new(f64::NAN, "serif").is_err());
}

#[test]
fn image_ref_rejects_bad_dimensions() {
    assert!(ImageRef::new("a", -1.0, 5.0).is_err());
    assert!(ImageRef::new("a", 5.0, f64::INFINITY).is_err());
    let img = ImageRef::new("hero", 32.0, 16.0).unwrap();
    assert_eq!(img.key(), "hero");
    assert_eq!(img.size(), Size::new(32.0, 16.0));
}

// =============================================================
// Circle
// =============================================================

#[test]
fn circle_dimensions() {
    let shape = Shape::Circle(Circle::new(10.0).unwrap());
    assert_eq!(shape.width(), 20.0);
    assert_eq!(shape.height(), 20.0);
    assert_eq!(shape.centroid(), Point::new(10.0, 10.0));
}

#[test]
fn circle_outline_has_fixed_resolution() {
    let c = Circle::new(10.0).unwrap();
    let outline = c.outline();
    assert_eq!(outline.len(), CIRCLE_HULL_SEGMENTS);
    // First vertex is the leftmost point.
    assert!(approx_eq(outline[0].x, 0.0));
    assert!(approx_eq(outline[0].y, 10.0));
    for p in &outline {
        assert!(approx_eq((p.x - 10.0).hypot(p.y - 10.0), 10.0));
    }
}

#[test]
fn circle_rejects_negative_radius() {
    assert!(Circle::new(-1.0).is_err());
    let mut c = Circle::new(1.0).unwrap();
    assert!(c.set_radius(f64::NAN).is_err());
    assert_eq!(c.radius(), 1.0);
}

// =============================================================
// Rectangle
// =============================================================

#[test]
fn rectangle_outline_is_box() {
    let shape = Shape::Rectangle(Rectangle::new(30.0, 20.0).unwrap());
    assert_eq!(
        shape.outline(),
        vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0), Point::new(30.0, 20.0), Point::new(0.0, 20.0)]
    );
    assert_eq!(shape.centroid(), Point::new(15.0, 10.0));
    assert!(shape.is_box());
}

#[test]
fn rectangle_set_size_is_atomic() {
    let mut r = Rectangle::new(1.0, 2.0).unwrap();
    assert!(r.set_size(5.0, -1.0).is_err());
    let shape = Shape::Rectangle(r);
    assert_eq!(shape.width(), 1.0);
    assert_eq!(shape.height(), 2.0);
}

// =============================================================
// Polygon
// =============================================================

#[test]
fn polygon_anchor_adjust_moves_min_to_origin() {
    let p = Polygon::new(square(5.0, 7.0, 10.0), true).unwrap();
    assert_eq!(p.vertices(), square(0.0, 0.0, 10.0).as_slice());
    assert_eq!(p.adjust_offset(), Point::new(5.0, 7.0));
    assert_eq!(p.raw_vertices(), square(5.0, 7.0, 10.0));
}

#[test]
fn polygon_without_anchor_keeps_vertices() {
    let p = Polygon::new(square(5.0, 7.0, 10.0), false).unwrap();
    assert_eq!(p.vertices(), square(5.0, 7.0, 10.0).as_slice());
    assert_eq!(p.adjust_offset(), Point::zero());
}

#[test]
fn polygon_anchor_toggle_is_reversible_and_idempotent() {
    let mut p = Polygon::new(square(-3.0, 4.0, 6.0), true).unwrap();
    p.set_anchor_adjust(true);
    assert_eq!(p.adjust_offset(), Point::new(-3.0, 4.0));
    p.set_anchor_adjust(false);
    assert_eq!(p.vertices(), square(-3.0, 4.0, 6.0).as_slice());
    assert_eq!(p.adjust_offset(), Point::zero());
    p.set_anchor_adjust(true);
    assert_eq!(p.vertices(), square(0.0, 0.0, 6.0).as_slice());
}

#[test]
fn polygon_set_vertices_reapplies_adjustment() {
    let mut p = Polygon::new(square(0.0, 0.0, 1.0), true).unwrap();
    p.set_vertices(square(10.0, 20.0, 2.0)).unwrap();
    assert_eq!(p.vertices(), square(0.0, 0.0, 2.0).as_slice());
    assert_eq!(p.adjust_offset(), Point::new(10.0, 20.0));
}

#[test]
fn polygon_rejects_non_finite_vertex() {
    let mut p = Polygon::new(square(0.0, 0.0, 1.0), true).unwrap();
    let bad = vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
    assert!(p.set_vertices(bad).is_err());
    assert_eq!(p.vertices().len(), 4);
}

#[test]
fn polygon_dimensions_from_extents() {
    let shape = Shape::Polygon(
        Polygon::new(vec![Point::new(0.0, 0.0), Point::new(40.0, 10.0), Point::new(10.0, 30.0)], false).unwrap(),
    );
    assert_eq!(shape.width(), 40.0);
    assert_eq!(shape.height(), 30.0);
}

#[test]
fn polygon_centroid_is_area_weighted() {
    // A triangle's area centroid is the mean of its vertices.
    let tri = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(6.0, 0.0), Point::new(0.0, 3.0)], false).unwrap();
    let c = tri.centroid();
    assert!(approx_eq(c.x, 2.0));
    assert!(approx_eq(c.y, 1.0));

    // Extra collinear vertices skew the vertex mean but not the area centroid.
    let sq = Polygon::new(
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ],
        false,
    )
    .unwrap();
    let c = sq.centroid();
    assert!(approx_eq(c.x, 2.0));
    assert!(approx_eq(c.y, 2.0));
}

#[test]
fn polygon_centroid_ignores_winding() {
    let mut ring = square(0.0, 0.0, 4.0);
    ring.reverse();
    let c = Polygon::new(ring, false).unwrap().centroid();
    assert!(approx_eq(c.x, 2.0));
    assert!(approx_eq(c.y, 2.0));
}

#[test]
fn degenerate_polygons() {
    let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 2.0)], false).unwrap();
    assert_eq!(line.centroid(), Point::new(2.0, 1.0));

    let empty = Shape::Polygon(Polygon::new(Vec::new(), true).unwrap());
    assert!(empty.centroid().x.is_nan());
    assert_eq!(empty.width(), 0.0);
    assert!(empty.outline().is_empty());
}

// =============================================================
// Text
// =============================================================

#[test]
fn text_is_measured_through_surface() {
    let surface = RecordingSurface::new(100.0, 100.0);
    let mut text = Text::new("hello", Font::default(), &surface);
    let shape = Shape::Text(text.clone());
    assert_eq!(shape.width(), 40.0);
    assert_eq!(shape.height(), 16.0);

    text.set_content("hi", &surface);
    assert_eq!(Shape::Text(text.clone()).width(), 16.0);

    text.set_font(Font::new(10.0, "serif").unwrap(), &surface);
    let shape = Shape::Text(text);
    assert_eq!(shape.width(), 10.0);
    assert_eq!(shape.height(), 10.0);
    assert!(!shape.is_box());
}

// =============================================================
// Sprite
// =============================================================

fn sheet() -> ImageRef {
    ImageRef::new("sheet", 120.0, 60.0).unwrap()
}

#[test]
fn sprite_cell_size() {
    let shape = Shape::Sprite(Sprite::new(sheet(), 4, 1, 2).unwrap());
    assert_eq!(shape.width(), 30.0);
    assert_eq!(shape.height(), 30.0);
}

#[test]
fn sprite_rejects_zero_counts() {
    assert!(Sprite::new(sheet(), 0, 1, 1).is_err());
    assert!(Sprite::new(sheet(), 1, 0, 1).is_err());
    assert!(Sprite::new(sheet(), 1, 1, 0).is_err());
}

#[test]
fn sprite_advances_every_tick_window_and_wraps() {
    let mut s = Sprite::new(sheet(), 3, 2, 1).unwrap();
    let mut seen = Vec::new();
    for _ in 0..6 {
        s.advance();
        seen.push(s.frame());
    }
    assert_eq!(seen, vec![1, 1, 2, 2, 0, 0]);
}

#[test]
fn stopped_sprite_finishes_its_cycle() {
    let mut s = Sprite::new(sheet(), 3, 1, 1).unwrap();
    s.advance();
    assert_eq!(s.frame(), 1);
    s.animated = false;
    s.advance();
    assert_eq!(s.frame(), 2);
    s.advance();
    assert_eq!(s.frame(), 0);
    s.advance();
    assert_eq!(s.frame(), 0);
}

#[test]
fn sprite_strip_and_frame_bounds() {
    let mut s = Sprite::new(sheet(), 4, 1, 2).unwrap();
    assert!(s.set_strip(1).is_ok());
    assert!(s.set_strip(2).is_err());
    assert!(s.set_frame(3).is_ok());
    assert!(s.set_frame(4).is_err());
    assert_eq!(s.strip(), 1);
    assert_eq!(s.frame(), 3);
}

// =============================================================
// Video
// =============================================================

struct FakeVideo(Size);

impl VideoSource for FakeVideo {
    fn key(&self) -> &str {
        "clip"
    }

    fn frame_size(&self) -> Size {
        self.0
    }
}

#[test]
fn video_tracks_source_frame_size() {
    let source = Rc::new(RefCell::new(FakeVideo(Size::new(320.0, 240.0))));
    let shape = Shape::Video(Video { source: source.clone() });
    assert_eq!(shape.width(), 320.0);
    source.borrow_mut().0 = Size::new(640.0, 480.0);
    assert_eq!(shape.height(), 480.0);
    assert!(format!("{shape:?}").contains("clip"));
}

#[test]
fn kind_names() {
    assert_eq!(Shape::Circle(Circle::new(1.0).unwrap()).kind(), "circle");
    assert_eq!(Shape::Image(Image { image: sheet() }).kind(), "image");
}
