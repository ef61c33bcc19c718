//! Scene graph: z-ordered layers of entities and groups, plus the timed draw pass.
//!
//! A [`Scene`] owns the drawing surface (inside a [`Canvas`]) and a root
//! [`Layer`]. Each layer entry pairs a [`Node`] with an integer order; the
//! entries are kept stably sorted so equal orders draw in insertion order.
//! A [`Group`] is itself a node that owns a nested layer, which lets several
//! entities be ordered, inserted and removed as a unit.
//!
//! Nodes are shared handles. Identity is `Rc` pointer identity, so the same
//! entity may sit in several groups and every holder sees one position.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::SceneConfig;
use crate::entity::{EntityId, EntityRef};
use crate::error::{SceneError, SceneResult};
use crate::input::{InputHandler, InputState, KeyEvent, KeyKind, PointerEvent, PointerKind, PointerScale};
use crate::surface::Surface;
use crate::timer::FrameClock;

/// Shared handle to a group.
pub type GroupRef = Rc<RefCell<Group>>;

/// Something that can be placed in a layer.
#[derive(Debug, Clone)]
pub enum Node {
    Entity(EntityRef),
    Group(GroupRef),
}

impl Node {
    /// Whether both nodes refer to the same entity or group.
    #[must_use]
    pub fn same(&self, other: &Node) -> bool {
        match (self, other) {
            (Self::Entity(a), Self::Entity(b)) => Rc::ptr_eq(a, b),
            (Self::Group(a), Self::Group(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<EntityRef> for Node {
    fn from(entity: EntityRef) -> Self {
        Self::Entity(entity)
    }
}

impl From<&EntityRef> for Node {
    fn from(entity: &EntityRef) -> Self {
        Self::Entity(Rc::clone(entity))
    }
}

impl From<GroupRef> for Node {
    fn from(group: GroupRef) -> Self {
        Self::Group(group)
    }
}

impl From<&GroupRef> for Node {
    fn from(group: &GroupRef) -> Self {
        Self::Group(Rc::clone(group))
    }
}

/// A node and its draw order.
#[derive(Debug, Clone)]
pub struct Entry {
    pub node: Node,
    pub order: i64,
}

/// Ordered list of nodes, lowest order first.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    entries: Vec<Entry>,
}

impl Layer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` at `order`, returning the new entry count.
    ///
    /// Adding a node that is already present adds a second entry.
    pub fn add(&mut self, node: impl Into<Node>, order: i64) -> usize {
        self.entries.push(Entry { node: node.into(), order });
        self.sort();
        self.entries.len()
    }

    /// Remove the first entry for `node`. Returns false if it was not present.
    pub fn remove(&mut self, node: impl Into<Node>) -> bool {
        let node = node.into();
        let Some(index) = self.position(&node) else {
            return false;
        };
        self.entries.remove(index);
        true
    }

    /// Move `node` to `order`. Returns false if it was not present.
    ///
    /// The moved entry goes after any existing entries with the same order.
    pub fn reorder(&mut self, node: impl Into<Node>, order: i64) -> bool {
        let node = node.into();
        let Some(index) = self.position(&node) else {
            return false;
        };
        let mut entry = self.entries.remove(index);
        entry.order = order;
        self.entries.push(entry);
        self.sort();
        true
    }

    /// Order of the first entry for `node`.
    #[must_use]
    pub fn order_of(&self, node: impl Into<Node>) -> Option<i64> {
        let node = node.into();
        self.position(&node).map(|i| self.entries[i].order)
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Leaf entities in draw order, descending into groups depth-first.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::CyclicGroup`] if a group contains itself.
    pub fn flatten(&self) -> SceneResult<Vec<EntityRef>> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.collect(&mut out, &mut path)?;
        Ok(out)
    }

    fn collect(&self, out: &mut Vec<EntityRef>, path: &mut Vec<*const RefCell<Group>>) -> SceneResult<()> {
        for entry in &self.entries {
            match &entry.node {
                Node::Entity(entity) => out.push(Rc::clone(entity)),
                Node::Group(group) => {
                    let ptr = Rc::as_ptr(group);
                    if path.contains(&ptr) {
                        return Err(SceneError::CyclicGroup);
                    }
                    path.push(ptr);
                    group.borrow().layer.collect(out, path)?;
                    path.pop();
                }
            }
        }
        Ok(())
    }

    fn position(&self, node: &Node) -> Option<usize> {
        self.entries.iter().position(|e| e.node.same(node))
    }

    // Vec::sort_by_key is stable.
    fn sort(&mut self) {
        self.entries.sort_by_key(|e| e.order);
    }
}

/// A named set of nodes ordered and drawn as a unit.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub name: String,
    layer: Layer,
}

impl Group {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), layer: Layer::new() }
    }

    #[must_use]
    pub fn into_ref(self) -> GroupRef {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }
}

/// The drawing surface together with the input state entities read while updating.
#[derive(Debug)]
pub struct Canvas<S> {
    pub surface: S,
    pub input: InputState,
    clock: FrameClock,
}

impl<S: Surface> Canvas<S> {
    #[must_use]
    pub fn new(surface: S, config: SceneConfig) -> Self {
        Self { surface, input: InputState::default(), clock: FrameClock::new(config) }
    }

    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Current display-to-backing pointer scale.
    #[must_use]
    pub fn pointer_scale(&self) -> PointerScale {
        PointerScale::between(self.surface.backing_size(), self.surface.display_size())
    }
}

/// A surface, its root layer and the input wiring.
pub struct Scene<S> {
    canvas: Canvas<S>,
    root: Layer,
    handler: Option<Box<dyn InputHandler>>,
}

impl<S: Surface> Scene<S> {
    /// Scene with the default frame timing.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, SceneConfig::default())
    }

    #[must_use]
    pub fn with_config(surface: S, config: SceneConfig) -> Self {
        Self { canvas: Canvas::new(surface, config), root: Layer::new(), handler: None }
    }

    // ── Graph ───────────────────────────────────────────────────

    /// Add an entity or group at `order`, returning the root entry count.
    pub fn add(&mut self, node: impl Into<Node>, order: i64) -> usize {
        self.root.add(node, order)
    }

    pub fn remove(&mut self, node: impl Into<Node>) -> bool {
        self.root.remove(node)
    }

    pub fn reorder(&mut self, node: impl Into<Node>, order: i64) -> bool {
        self.root.reorder(node, order)
    }

    #[must_use]
    pub fn order_of(&self, node: impl Into<Node>) -> Option<i64> {
        self.root.order_of(node)
    }

    /// Number of root entries (groups count once).
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    #[must_use]
    pub fn root(&self) -> &Layer {
        &self.root
    }

    /// Every leaf entity in draw order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::CyclicGroup`] if a group contains itself.
    pub fn entities(&self) -> SceneResult<Vec<EntityRef>> {
        self.root.flatten()
    }

    // ── Surface ─────────────────────────────────────────────────

    #[must_use]
    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas<S> {
        &mut self.canvas
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.canvas.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.canvas.surface
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.canvas.input
    }

    /// Erase the surface. The scene graph is untouched.
    ///
    /// # Errors
    ///
    /// Surface failures.
    pub fn clear(&mut self) -> SceneResult<()> {
        self.canvas.surface.clear()
    }

    /// Draw and update every entity once, in order.
    ///
    /// `timestamp` is the host's frame time in milliseconds; without one the
    /// configured default step is used. Returns the step applied.
    ///
    /// # Errors
    ///
    /// A non-finite timestamp, a cyclic group, an entity the host still has
    /// borrowed, or the first entity update that fails. Entities after a
    /// failing one are not updated this frame.
    pub fn draw(&mut self, timestamp: Option<f64>) -> SceneResult<f64> {
        let dt = self.canvas.clock.tick(timestamp)?;
        let entities = self.root.flatten()?;
        trace!(frame = self.canvas.clock.frames(), count = entities.len(), dt, "drawing frame");
        for handle in &entities {
            let Ok(mut entity) = handle.try_borrow_mut() else {
                // Nil id when the host holds a mutable borrow.
                let id = handle.try_borrow().map_or(EntityId::nil(), |e| e.id());
                return Err(SceneError::EntityBusy(id));
            };
            entity.update(&mut self.canvas, dt)?;
        }
        Ok(dt)
    }

    // ── Input ───────────────────────────────────────────────────

    /// Install the handler that receives pointer and key callbacks.
    pub fn set_input_handler(&mut self, handler: impl InputHandler + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Record a pointer event and dispatch it to the handler.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let pointer = self.canvas.pointer_scale().apply(event.offset);
        self.canvas.input.pointer = pointer;
        let Some(handler) = self.handler.as_mut() else {
            return;
        };
        let input = &self.canvas.input;
        match event.kind {
            PointerKind::Click => handler.on_click(input),
            PointerKind::Down => handler.on_pointer_down(input),
            PointerKind::Move => handler.on_pointer_move(input),
            PointerKind::Up => handler.on_pointer_up(input),
        }
    }

    /// Dispatch a key event. The key code is visible in [`InputState::key`]
    /// only while the handler runs.
    pub fn handle_key(&mut self, event: KeyEvent) {
        debug!(code = event.code.as_str(), kind = ?event.kind, "key event");
        self.canvas.input.key = Some(event.code);
        if let Some(handler) = self.handler.as_mut() {
            let input = &self.canvas.input;
            match event.kind {
                KeyKind::Down => handler.on_key_down(input),
                KeyKind::Up => handler.on_key_up(input),
            }
        }
        self.canvas.input.key = None;
    }
}
