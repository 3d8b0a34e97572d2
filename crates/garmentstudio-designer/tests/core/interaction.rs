use std::sync::Arc;

use garmentstudio_core::geometry::{DisplayPoint, UvRect};
use garmentstudio_designer::element::{DesignElement, ImageSlot};
use garmentstudio_designer::element_store::ElementStore;
use garmentstudio_designer::interaction::{InteractionController, PointerOutcome, PointerState};
use garmentstudio_designer::mapper::CoordinateMapper;
use garmentstudio_designer::parts::{PartId, PartRegistry};

fn setup() -> (InteractionController, ElementStore, PartRegistry, CoordinateMapper) {
    (
        InteractionController::new(),
        ElementStore::new(),
        PartRegistry::default(),
        CoordinateMapper::new(400.0, 400.0, 2048),
    )
}

fn add_element(store: &mut ElementStore, rect: UvRect) -> u64 {
    let id = store.generate_id();
    store.insert(DesignElement::new(
        id,
        PartId::new("front"),
        rect,
        ImageSlot::Ready(Arc::new(image::RgbaImage::new(4, 4))),
    ));
    id
}

#[test]
fn test_initial_state_is_idle() {
    let (controller, _, _, _) = setup();
    assert_eq!(controller.state(), PointerState::Idle);
    assert_eq!(controller.selected_id(), None);
    assert_eq!(controller.active_part(), None);
}

#[test]
fn test_pointer_down_on_element_selects() {
    let (mut controller, mut store, registry, mapper) = setup();
    // Display box: (100, 120) to (160, 200) on the 400px canvas
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));

    let outcome = controller.pointer_down(DisplayPoint::new(130.0, 160.0), &store, &registry, &mapper);
    assert_eq!(outcome, PointerOutcome::SelectedElement(id));
    assert_eq!(controller.state(), PointerState::Selected { id });
}

#[test]
fn test_element_hit_beats_part_region() {
    let (mut controller, mut store, registry, mapper) = setup();
    // Element inside the "front" part's region
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));

    let pos = DisplayPoint::new(130.0, 160.0);
    let uv = mapper.to_uv(pos);
    assert!(registry.hit_test(uv).is_some(), "point must sit inside a part region");

    let outcome = controller.pointer_down(pos, &store, &registry, &mapper);
    assert_eq!(outcome, PointerOutcome::SelectedElement(id));
    assert_eq!(controller.active_part(), None);
}

#[test]
fn test_topmost_element_wins() {
    let (mut controller, mut store, registry, mapper) = setup();
    let _bottom = add_element(&mut store, UvRect::new(0.2, 0.2, 0.3, 0.3));
    let top = add_element(&mut store, UvRect::new(0.3, 0.3, 0.3, 0.3));

    // Point inside both boxes
    let outcome = controller.pointer_down(DisplayPoint::new(140.0, 140.0), &store, &registry, &mapper);
    assert_eq!(outcome, PointerOutcome::SelectedElement(top));
}

#[test]
fn test_empty_click_in_region_activates_part() {
    let (mut controller, store, registry, mapper) = setup();
    // UV (0.25, 0.25) lies in the front region, no elements exist
    let outcome = controller.pointer_down(DisplayPoint::new(100.0, 100.0), &store, &registry, &mapper);
    assert_eq!(outcome, PointerOutcome::PartActivated(PartId::new("front")));
    assert_eq!(controller.active_part(), Some(&PartId::new("front")));
    assert_eq!(controller.state(), PointerState::Idle);
}

#[test]
fn test_empty_click_clears_selection() {
    let (mut controller, mut store, registry, mapper) = setup();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));
    controller.pointer_down(DisplayPoint::new(130.0, 160.0), &store, &registry, &mapper);
    assert_eq!(controller.selected_id(), Some(id));
    controller.pointer_up(DisplayPoint::new(130.0, 160.0), &mut store, &mapper);

    // Back region click: selection gone, part retargeted
    let outcome = controller.pointer_down(DisplayPoint::new(300.0, 100.0), &store, &registry, &mapper);
    assert_eq!(outcome, PointerOutcome::PartActivated(PartId::new("back")));
    assert_eq!(controller.selected_id(), None);
}

#[test]
fn test_small_movement_does_not_start_drag() {
    let (mut controller, mut store, registry, mapper) = setup();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));
    controller.pointer_down(DisplayPoint::new(130.0, 160.0), &store, &registry, &mapper);

    let outcome = controller.pointer_move(DisplayPoint::new(131.0, 160.5), &mut store, &mapper);
    assert_eq!(outcome, PointerOutcome::Ignored);
    assert_eq!(controller.state(), PointerState::Selected { id });
}

#[test]
fn test_drag_moves_element_and_commits() {
    let (mut controller, mut store, registry, mapper) = setup();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));

    // Grab at the element origin plus (30, 40)
    controller.pointer_down(DisplayPoint::new(130.0, 160.0), &store, &registry, &mapper);
    let outcome = controller.pointer_move(DisplayPoint::new(150.0, 180.0), &mut store, &mapper);
    assert_eq!(outcome, PointerOutcome::DragStarted(id));
    assert_eq!(controller.state(), PointerState::Dragging { id });

    let outcome = controller.pointer_up(DisplayPoint::new(170.0, 200.0), &mut store, &mapper);
    assert_eq!(outcome, PointerOutcome::DragCommitted(id));
    assert_eq!(controller.state(), PointerState::Selected { id });

    // Pointer moved +40/+40 from the grab point, so the element origin
    // moved from (100, 120) to (140, 160) => UV (0.35, 0.4)
    let element = store.get(id).unwrap();
    assert!((element.uv_position().x - 0.35).abs() < 1e-9);
    assert!((element.uv_position().y - 0.4).abs() < 1e-9);
}

#[test]
fn test_drag_clamps_to_unit_square() {
    let (mut controller, mut store, registry, mapper) = setup();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));

    controller.pointer_down(DisplayPoint::new(130.0, 160.0), &store, &registry, &mapper);
    controller.pointer_move(DisplayPoint::new(200.0, 200.0), &mut store, &mapper);
    // Way past the right/bottom edge
    controller.pointer_up(DisplayPoint::new(2000.0, 2000.0), &mut store, &mapper);

    let element = store.get(id).unwrap();
    let pos = element.uv_position();
    let size = element.uv_size();
    assert_eq!(pos.x, 1.0 - size.width);
    assert_eq!(pos.y, 1.0 - size.height);
}

#[test]
fn test_notify_removed_returns_to_idle() {
    let (mut controller, mut store, registry, mapper) = setup();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));
    controller.pointer_down(DisplayPoint::new(130.0, 160.0), &store, &registry, &mapper);
    assert_eq!(controller.selected_id(), Some(id));

    store.remove(id);
    controller.notify_removed(id);
    assert_eq!(controller.state(), PointerState::Idle);
}

#[test]
fn test_pointer_up_without_drag_is_ignored() {
    let (mut controller, mut store, registry, mapper) = setup();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));
    controller.pointer_down(DisplayPoint::new(130.0, 160.0), &store, &registry, &mapper);

    let outcome = controller.pointer_up(DisplayPoint::new(130.0, 160.0), &mut store, &mapper);
    assert_eq!(outcome, PointerOutcome::Ignored);
    assert_eq!(controller.state(), PointerState::Selected { id });

    // The element did not move
    let element = store.get(id).unwrap();
    assert!((element.uv_position().x - 0.25).abs() < 1e-9);
}
