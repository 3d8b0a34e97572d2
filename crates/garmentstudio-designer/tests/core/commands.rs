use std::sync::Arc;

use garmentstudio_core::geometry::{UvPoint, UvRect, UvSize};
use garmentstudio_designer::commands::{MoveElement, RemoveElement, StudioCommand};
use garmentstudio_designer::element::{DesignElement, ImageSlot};
use garmentstudio_designer::element_store::ElementStore;
use garmentstudio_designer::parts::PartId;

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
fn test_move_apply_and_undo() {
    let mut store = ElementStore::new();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));

    let mut cmd = StudioCommand::MoveElement(MoveElement {
        id,
        from: UvPoint::new(0.25, 0.3),
        to: UvPoint::new(0.5, 0.5),
    });

    cmd.apply(&mut store);
    assert_eq!(store.get(id).unwrap().uv_position(), UvPoint::new(0.5, 0.5));

    cmd.undo(&mut store);
    assert_eq!(store.get(id).unwrap().uv_position(), UvPoint::new(0.25, 0.3));
}

#[test]
fn test_remove_undo_restores_element_and_z_position() {
    let mut store = ElementStore::new();
    let bottom = add_element(&mut store, UvRect::new(0.1, 0.1, 0.2, 0.2));
    let middle = add_element(&mut store, UvRect::new(0.2, 0.2, 0.2, 0.2));
    let top = add_element(&mut store, UvRect::new(0.3, 0.3, 0.2, 0.2));

    let mut cmd = StudioCommand::RemoveElement(RemoveElement {
        id: middle,
        index: 0,
        element: None,
    });

    cmd.apply(&mut store);
    assert!(store.get(middle).is_none());
    assert_eq!(store.len(), 2);

    cmd.undo(&mut store);
    assert_eq!(store.len(), 3);
    let order: Vec<u64> = store.draw_order_iter().collect();
    assert_eq!(order, vec![bottom, middle, top]);

    let restored = store.get(middle).unwrap();
    assert_eq!(restored.uv_position(), UvPoint::new(0.2, 0.2));
}

#[test]
fn test_remove_redo_after_undo() {
    let mut store = ElementStore::new();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));

    let mut cmd = StudioCommand::RemoveElement(RemoveElement {
        id,
        index: 0,
        element: None,
    });

    cmd.apply(&mut store);
    cmd.undo(&mut store);
    cmd.apply(&mut store);
    assert!(store.get(id).is_none());
}

#[test]
fn test_resize_rotate_opacity_roundtrip() {
    let mut store = ElementStore::new();
    let id = add_element(&mut store, UvRect::new(0.25, 0.3, 0.15, 0.2));

    let mut resize = StudioCommand::ResizeElement(garmentstudio_designer::commands::ResizeElement {
        id,
        from: UvSize::new(0.15, 0.2),
        to: UvSize::new(0.4, 0.4),
    });
    resize.apply(&mut store);
    assert_eq!(store.get(id).unwrap().uv_size(), UvSize::new(0.4, 0.4));
    resize.undo(&mut store);
    assert_eq!(store.get(id).unwrap().uv_size(), UvSize::new(0.15, 0.2));

    let mut rotate = StudioCommand::RotateElement(garmentstudio_designer::commands::RotateElement {
        id,
        from: 0.0,
        to: 90.0,
    });
    rotate.apply(&mut store);
    assert_eq!(store.get(id).unwrap().rotation_degrees(), 90.0);
    rotate.undo(&mut store);
    assert_eq!(store.get(id).unwrap().rotation_degrees(), 0.0);

    let mut opacity = StudioCommand::SetOpacity(garmentstudio_designer::commands::SetOpacity {
        id,
        from: 1.0,
        to: 0.5,
    });
    opacity.apply(&mut store);
    assert_eq!(store.get(id).unwrap().opacity(), 0.5);
    opacity.undo(&mut store);
    assert_eq!(store.get(id).unwrap().opacity(), 1.0);
}

#[test]
fn test_command_on_missing_element_is_noop() {
    let mut store = ElementStore::new();
    let mut cmd = StudioCommand::MoveElement(MoveElement {
        id: 42,
        from: UvPoint::new(0.1, 0.1),
        to: UvPoint::new(0.2, 0.2),
    });
    cmd.apply(&mut store);
    cmd.undo(&mut store);
    assert!(store.is_empty());
}
