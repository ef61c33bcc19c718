#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::entity::Entity;
use crate::error::SceneError;
use crate::surface::{DrawOp, RecordingSurface};

#[derive(Debug, Default)]
struct FakeElement {
    playing: bool,
    position: f64,
    volume: f64,
    source: String,
    fail_play: bool,
}

impl MediaBackend for FakeElement {
    fn play(&mut self) -> SceneResult<()> {
        if self.fail_play {
            return Err(SceneError::Surface("autoplay blocked".into()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn duration(&self) -> f64 {
        120.0
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn source(&self) -> String {
        self.source.clone()
    }

    fn set_source(&mut self, source: &str) {
        self.source = source.to_owned();
    }
}

impl VideoBackend for FakeElement {
    fn key(&self) -> &str {
        "clip"
    }

    fn video_size(&self) -> Size {
        Size::new(320.0, 180.0)
    }

    fn display_size(&self) -> Size {
        Size::new(160.0, 90.0)
    }
}

// =============================================================
// Media
// =============================================================

#[test]
fn play_resumes_unless_restarting() {
    let mut sound: Sound<FakeElement> = Media::new(FakeElement::default());
    sound.backend_mut().position = 12.0;
    sound.play(false).unwrap();
    assert!(sound.backend().playing);
    assert_eq!(sound.position(), 12.0);

    sound.play(true).unwrap();
    assert_eq!(sound.position(), 0.0);
}

#[test]
fn play_failure_propagates() {
    let mut sound = Media::new(FakeElement { fail_play: true, ..FakeElement::default() });
    assert!(sound.play(false).is_err());
    assert!(!sound.backend().playing);
}

#[test]
fn stop_pauses_and_rewinds() {
    let mut sound = Media::new(FakeElement::default());
    sound.play(false).unwrap();
    sound.seek(30.0).unwrap();
    sound.stop();
    assert!(!sound.backend().playing);
    assert_eq!(sound.position(), 0.0);
}

#[test]
fn seek_rejects_bad_positions() {
    let mut sound = Media::new(FakeElement::default());
    assert!(sound.seek(-1.0).is_err());
    assert!(sound.seek(f64::NAN).is_err());
    assert_eq!(sound.position(), 0.0);
}

#[test]
fn volume_is_clamped() {
    let mut sound = Media::new(FakeElement::default());
    sound.set_volume(3.0).unwrap();
    assert_eq!(sound.volume(), 1.0);
    sound.set_volume(-3.0).unwrap();
    assert_eq!(sound.volume(), 0.0);
    assert!(sound.set_volume(f64::NAN).is_err());
}

#[test]
fn source_and_duration_pass_through() {
    let mut sound = Media::new(FakeElement::default());
    sound.set_source("boom.ogg");
    assert_eq!(sound.source(), "boom.ogg");
    assert_eq!(sound.duration(), 120.0);
}

// =============================================================
// Movie
// =============================================================

#[test]
fn movie_reports_sizes() {
    let movie = Movie::new(FakeElement::default());
    assert_eq!(movie.video_size(), Size::new(320.0, 180.0));
    assert_eq!(movie.display_size(), Size::new(160.0, 90.0));
    assert_eq!(movie.frame_size(), movie.video_size());
}

#[test]
fn movie_draws_as_video_entity() {
    let movie = Rc::new(RefCell::new(Movie::new(FakeElement::default())));
    let entity = Entity::video(0.0, 0.0, movie.clone()).unwrap();
    assert_eq!(entity.width(), 320.0);
    assert_eq!(entity.height(), 180.0);

    let mut surface = RecordingSurface::new(640.0, 480.0);
    crate::render::draw_entity(&mut surface, &entity).unwrap();
    assert!(surface.ops().iter().any(|op| matches!(op, DrawOp::DrawImage { key, .. } if key == "clip")));
    movie.borrow_mut().media_mut().play(true).unwrap();
    assert!(movie.borrow().media().backend().playing);
}
