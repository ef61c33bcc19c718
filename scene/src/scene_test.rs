#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::entity::Entity;
use crate::geom::{Point, Size};
use crate::surface::{DrawOp, RecordingSurface};

fn ball(x: f64) -> EntityRef {
    Entity::circle(x, 0.0, 1.0).unwrap().into_ref()
}

fn scene() -> Scene<RecordingSurface> {
    Scene::new(RecordingSurface::new(800.0, 600.0))
}

/// x positions of the flattened entities, used as labels.
fn labels(scene: &Scene<RecordingSurface>) -> Vec<f64> {
    scene.entities().unwrap().iter().map(|e| e.borrow().position().x).collect()
}

// =============================================================
// Layer ordering
// =============================================================

#[test]
fn entities_draw_in_ascending_order() {
    let mut scene = scene();
    let (a, b, c) = (ball(3.0), ball(1.0), ball(2.0));
    assert_eq!(scene.add(&a, 3), 1);
    assert_eq!(scene.add(&b, 1), 2);
    assert_eq!(scene.add(&c, 2), 3);
    assert_eq!(labels(&scene), vec![1.0, 2.0, 3.0]);

    assert!(scene.reorder(&c, 0));
    assert_eq!(labels(&scene), vec![2.0, 1.0, 3.0]);
    assert_eq!(scene.order_of(&c), Some(0));
}

#[test]
fn equal_orders_keep_insertion_order() {
    let mut scene = scene();
    for x in [5.0, 4.0, 3.0, 2.0] {
        scene.add(ball(x), 7);
    }
    assert_eq!(labels(&scene), vec![5.0, 4.0, 3.0, 2.0]);
}

#[test]
fn reorder_places_entry_after_equal_orders() {
    let mut scene = scene();
    let (a, b, c) = (ball(1.0), ball(2.0), ball(3.0));
    scene.add(&a, 0);
    scene.add(&b, 0);
    scene.add(&c, 1);
    scene.reorder(&a, 0);
    assert_eq!(labels(&scene), vec![2.0, 1.0, 3.0]);
}

#[test]
fn missing_nodes_report_false() {
    let mut scene = scene();
    let stranger = ball(0.0);
    assert!(!scene.remove(&stranger));
    assert!(!scene.reorder(&stranger, 3));
    assert_eq!(scene.order_of(&stranger), None);
}

#[test]
fn identity_is_by_handle_not_value() {
    let mut scene = scene();
    let a = ball(1.0);
    let twin = ball(1.0);
    scene.add(&a, 0);
    assert!(!scene.remove(&twin));
    assert!(scene.remove(&a));
    assert!(scene.is_empty());
}

#[test]
fn remove_drops_one_entry() {
    let mut scene = scene();
    let a = ball(1.0);
    scene.add(&a, 0);
    scene.add(&a, 5);
    assert_eq!(scene.len(), 2);
    assert!(scene.remove(&a));
    assert_eq!(scene.order_of(&a), Some(5));
}

// =============================================================
// Groups
// =============================================================

#[test]
fn groups_flatten_depth_first() {
    let mut scene = scene();
    let group = Group::new("pair").into_ref();
    group.borrow_mut().layer_mut().add(ball(3.0), 1);
    group.borrow_mut().layer_mut().add(ball(2.0), 0);
    scene.add(ball(1.0), 0);
    scene.add(&group, 1);
    scene.add(ball(4.0), 2);
    assert_eq!(scene.len(), 3);
    assert_eq!(labels(&scene), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn groups_reorder_as_a_unit() {
    let mut scene = scene();
    let group = Group::new("g").into_ref();
    group.borrow_mut().layer_mut().add(ball(1.0), 0);
    group.borrow_mut().layer_mut().add(ball(2.0), 0);
    scene.add(ball(9.0), 5);
    scene.add(&group, 10);
    scene.reorder(&group, 0);
    assert_eq!(labels(&scene), vec![1.0, 2.0, 9.0]);
    assert!(scene.remove(&group));
    assert_eq!(labels(&scene), vec![9.0]);
}

#[test]
fn cyclic_groups_are_reported() {
    let mut scene = scene();
    let outer = Group::new("outer").into_ref();
    let inner = Group::new("inner").into_ref();
    inner.borrow_mut().layer_mut().add(&outer, 0);
    outer.borrow_mut().layer_mut().add(&inner, 0);
    scene.add(&outer, 0);
    assert!(matches!(scene.entities(), Err(SceneError::CyclicGroup)));
    assert!(matches!(scene.draw(None), Err(SceneError::CyclicGroup)));
    // Break the cycle so the Rc pair can be freed.
    inner.borrow_mut().layer_mut().remove(&outer);
}

#[test]
fn shared_group_in_two_places_is_not_a_cycle() {
    let mut scene = scene();
    let shared = Group::new("shared").into_ref();
    shared.borrow_mut().layer_mut().add(ball(1.0), 0);
    scene.add(&shared, 0);
    scene.add(&shared, 1);
    assert_eq!(labels(&scene), vec![1.0, 1.0]);
}

// =============================================================
// Draw pass
// =============================================================

#[test]
fn draw_without_timestamp_uses_default_step() {
    let mut scene = scene();
    let e = ball(0.0);
    e.borrow_mut().motion_mut().set_velocity(60.0).unwrap();
    scene.add(&e, 0);
    let dt = scene.draw(None).unwrap();
    assert_eq!(dt, 1.0 / 60.0);
    assert!((e.borrow().position().x - 1.0).abs() < 1e-12);
}

#[test]
fn draw_clamps_large_gaps() {
    let mut scene = scene();
    let e = ball(0.0);
    e.borrow_mut().motion_mut().set_velocity(30.0).unwrap();
    scene.add(&e, 0);
    scene.draw(Some(0.0)).unwrap();
    let start = e.borrow().position().x;
    let dt = scene.draw(Some(3_600_000.0)).unwrap();
    assert_eq!(dt, 1.0 / 30.0);
    assert!((e.borrow().position().x - start - 1.0).abs() < 1e-9);
}

#[test]
fn draw_updates_each_entry_in_order() {
    let mut scene = scene();
    scene.add(Entity::rectangle(0.0, 0.0, 2.0, 2.0).unwrap().into_ref(), 1);
    scene.add(Entity::circle(0.0, 0.0, 1.0).unwrap().into_ref(), 0);
    scene.draw(None).unwrap();
    let ops = scene.surface().ops();
    let first_shape = ops.iter().find(|op| matches!(op, DrawOp::FillCircle { .. } | DrawOp::FillPolygon { .. }));
    assert!(matches!(first_shape, Some(DrawOp::FillCircle { .. })));
}

#[test]
fn draw_stops_at_first_failing_entity() {
    let mut scene = scene();
    let e = ball(0.0);
    scene.add(&e, 0);
    assert!(scene.draw(Some(f64::NAN)).is_err());
    assert!(scene.surface().ops().is_empty());
}

#[test]
fn entity_borrowed_by_host_aborts_draw() {
    let mut scene = scene();
    let (a, b) = (ball(1.0), ball(2.0));
    scene.add(&a, 0);
    scene.add(&b, 1);

    let held = b.borrow();
    let err = scene.draw(None).unwrap_err();
    assert!(matches!(err, SceneError::EntityBusy(id) if id == held.id()), "{err}");
    drop(held);

    let held = b.borrow_mut();
    assert!(matches!(scene.draw(None), Err(SceneError::EntityBusy(id)) if id.is_nil()));
    drop(held);

    assert!(scene.draw(None).is_ok());
}

#[test]
fn clear_erases_surface_only() {
    let mut scene = scene();
    scene.add(ball(0.0), 0);
    scene.clear().unwrap();
    assert_eq!(scene.surface().ops(), &[DrawOp::Clear]);
    assert_eq!(scene.len(), 1);
}

// =============================================================
// Input
// =============================================================

#[derive(Default)]
struct Log {
    events: Vec<String>,
}

struct Recorder(Rc<RefCell<Log>>);

impl InputHandler for Recorder {
    fn on_click(&mut self, input: &InputState) {
        self.0.borrow_mut().events.push(format!("click {} {}", input.pointer.x, input.pointer.y));
    }

    fn on_pointer_move(&mut self, input: &InputState) {
        self.0.borrow_mut().events.push(format!("move {} {}", input.pointer.x, input.pointer.y));
    }

    fn on_key_down(&mut self, input: &InputState) {
        let code = input.key.as_ref().map_or("none", |k| k.as_str()).to_owned();
        self.0.borrow_mut().events.push(format!("down {code}"));
    }

    fn on_key_up(&mut self, input: &InputState) {
        let code = input.key.as_ref().map_or("none", |k| k.as_str()).to_owned();
        self.0.borrow_mut().events.push(format!("up {code}"));
    }
}

#[test]
fn pointer_events_are_scaled_and_dispatched() {
    let surface = RecordingSurface::with_display(Size::new(800.0, 600.0), Size::new(400.0, 300.0));
    let mut scene = Scene::new(surface);
    let log = Rc::new(RefCell::new(Log::default()));
    scene.set_input_handler(Recorder(Rc::clone(&log)));

    scene.handle_pointer(PointerEvent::new(PointerKind::Move, 10.25, 20.0));
    scene.handle_pointer(PointerEvent::new(PointerKind::Click, 1.0, 1.0));
    scene.handle_pointer(PointerEvent::new(PointerKind::Down, 100.0, 100.0));
    assert_eq!(scene.input().pointer, Point::new(200.0, 200.0));
    assert_eq!(log.borrow().events, vec!["move 20 40", "click 2 2"]);
}

#[test]
fn pointer_updates_without_handler() {
    let mut scene = scene();
    scene.handle_pointer(PointerEvent::new(PointerKind::Up, 7.0, 8.0));
    assert_eq!(scene.input().pointer, Point::new(7.0, 8.0));
}

#[test]
fn key_code_visible_only_during_dispatch() {
    let mut scene = scene();
    let log = Rc::new(RefCell::new(Log::default()));
    scene.set_input_handler(Recorder(Rc::clone(&log)));
    scene.handle_key(KeyEvent::new(KeyKind::Down, "Space"));
    assert!(scene.input().key.is_none());
    scene.handle_key(KeyEvent::new(KeyKind::Up, "Space"));
    assert!(scene.input().key.is_none());
    assert_eq!(log.borrow().events, vec!["down Space", "up Space"]);
}

#[test]
fn captured_entity_tracks_injected_pointer() {
    let mut scene = scene();
    let e = Entity::rectangle(10.0, 10.0, 5.0, 5.0).unwrap().into_ref();
    scene.add(&e, 0);
    scene.handle_pointer(PointerEvent::new(PointerKind::Down, 12.0, 12.0));
    e.borrow_mut().capture(scene.input());
    scene.handle_pointer(PointerEvent::new(PointerKind::Move, 50.0, 60.0));
    scene.draw(None).unwrap();
    assert_eq!(e.borrow().position(), Point::new(48.0, 58.0));
}
