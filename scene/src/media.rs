//! Audio and video playback boundary.
//!
//! Playback itself belongs to the host. A [`MediaBackend`] is the handful of
//! element operations the scene relies on; [`Media`] layers the validated
//! convenience API on top (restart-on-play, stop as pause plus rewind,
//! clamped volume). A [`Movie`] additionally reports frame sizes and can be
//! drawn through a [`crate::shape::Shape::Video`] entity.

#[cfg(test)]
#[path = "media_test.rs"]
mod media_test;

use crate::error::{SceneResult, finite, non_negative};
use crate::geom::Size;
use crate::shape::VideoSource;

/// A host media element (an HTML `<audio>`/`<video>`, a native player, a fake).
pub trait MediaBackend {
    fn play(&mut self) -> SceneResult<()>;
    fn pause(&mut self);
    /// Playback position in seconds.
    fn position(&self) -> f64;
    fn set_position(&mut self, seconds: f64);
    /// Length in seconds; NaN while unknown.
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn source(&self) -> String;
    fn set_source(&mut self, source: &str);
}

/// A video element.
pub trait VideoBackend: MediaBackend {
    /// Key the drawing surface uses for this element.
    fn key(&self) -> &str;
    /// Intrinsic size of the video frames.
    fn video_size(&self) -> Size;
    /// Size the element is displayed at.
    fn display_size(&self) -> Size;
}

/// Playback controls over a backend.
#[derive(Debug, Clone)]
pub struct Media<B> {
    backend: B,
}

/// Audio clip.
pub type Sound<B> = Media<B>;

impl<B: MediaBackend> Media<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Start playback, from the beginning when `from_start` is set and from
    /// the current position otherwise.
    ///
    /// # Errors
    ///
    /// Whatever the backend reports when playback cannot start.
    pub fn play(&mut self, from_start: bool) -> SceneResult<()> {
        if from_start {
            self.backend.set_position(0.0);
        }
        self.backend.play()
    }

    pub fn pause(&mut self) {
        self.backend.pause();
    }

    /// Pause and rewind.
    pub fn stop(&mut self) {
        self.backend.pause();
        self.backend.set_position(0.0);
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.backend.position()
    }

    /// Jump to `seconds`.
    ///
    /// # Errors
    ///
    /// Rejects a negative or non-finite position.
    pub fn seek(&mut self, seconds: f64) -> SceneResult<()> {
        self.backend.set_position(non_negative("position", seconds)?);
        Ok(())
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.backend.duration()
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.backend.volume()
    }

    /// # Errors
    ///
    /// Rejects non-finite input; finite input is clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f64) -> SceneResult<()> {
        self.backend.set_volume(finite("volume", volume)?.clamp(0.0, 1.0));
        Ok(())
    }

    #[must_use]
    pub fn source(&self) -> String {
        self.backend.source()
    }

    pub fn set_source(&mut self, source: &str) {
        self.backend.set_source(source);
    }
}

/// A video clip that can be drawn as an entity.
#[derive(Debug, Clone)]
pub struct Movie<B> {
    media: Media<B>,
}

impl<B: VideoBackend> Movie<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { media: Media::new(backend) }
    }

    #[must_use]
    pub fn media(&self) -> &Media<B> {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut Media<B> {
        &mut self.media
    }

    #[must_use]
    pub fn video_size(&self) -> Size {
        self.media.backend.video_size()
    }

    #[must_use]
    pub fn display_size(&self) -> Size {
        self.media.backend.display_size()
    }
}

impl<B: VideoBackend> VideoSource for Movie<B> {
    fn key(&self) -> &str {
        self.media.backend.key()
    }

    fn frame_size(&self) -> Size {
        self.video_size()
    }
}
