//! Scene core for small 2D playfields.
//!
//! Entities (circles, rectangles, polygons, text, images, sprite sheets and
//! video frames) live on a drawing surface and share one motion, rotation,
//! gravity and collision model. A z-ordered scene graph sequences their
//! per-frame updates. Everything that actually touches pixels sits behind the
//! [`surface::Surface`] trait; the host feeds pointer and keyboard events in
//! through [`scene::Scene::handle_pointer`] and [`scene::Scene::handle_key`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`scene`] | Scene graph, layers, groups and the timed draw pass |
//! | [`entity`] | Entity state, hull, containment, collision and motion integration |
//! | [`shape`] | Concrete shape variants and their intrinsic geometry |
//! | [`hit`] | Ray-cast containment and collision types |
//! | [`geom`] | Points, sizes, rectangles and polar conversion |
//! | [`render`] | Per-shape draw callbacks issued to a [`surface::Surface`] |
//! | [`surface`] | Drawing surface contract and a headless recording surface |
//! | [`input`] | Pointer/key events, pointer scaling and input handlers |
//! | [`timer`] | Stopwatch with pause support |
//! | [`media`] | Audio/video element boundary |
//! | [`blueprint`] | JSON scene descriptions |
//! | [`config`] | Frame timing configuration |
//! | [`error`] | Error type shared by the crate |
//! | [`consts`] | Shared numeric constants |

pub mod blueprint;
pub mod config;
pub mod consts;
pub mod entity;
pub mod error;
pub mod geom;
pub mod hit;
pub mod input;
pub mod media;
pub mod render;
pub mod scene;
pub mod shape;
pub mod surface;
pub mod timer;
#[cfg(feature = "web")]
pub mod web;

pub use entity::{Entity, EntityId, EntityRef};
pub use error::{SceneError, SceneResult};
pub use geom::Point;
pub use hit::{CollideOptions, Collision, Direction};
pub use scene::Scene;
