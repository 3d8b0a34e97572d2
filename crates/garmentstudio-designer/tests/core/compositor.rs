use std::sync::Arc;

use image::{Rgba, RgbaImage};
use uuid::Uuid;

use garmentstudio_core::geometry::UvRect;
use garmentstudio_designer::compositor::composite;
use garmentstudio_designer::element::{DesignElement, ImageSlot};
use garmentstudio_designer::element_store::ElementStore;
use garmentstudio_designer::parts::PartId;

fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

fn add_ready(store: &mut ElementStore, rect: UvRect, color: [u8; 4]) -> u64 {
    let id = store.generate_id();
    store.insert(DesignElement::new(
        id,
        PartId::new("front"),
        rect,
        ImageSlot::Ready(Arc::new(solid(8, 8, color))),
    ));
    id
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

#[test]
fn test_empty_store_renders_transparent() {
    let store = ElementStore::new();
    let out = composite(None, &store, 64, 64);
    assert_eq!(out.get_pixel(32, 32).0, [0, 0, 0, 0]);
}

#[test]
fn test_base_fills_output() {
    let store = ElementStore::new();
    let base = solid(16, 16, WHITE);
    let out = composite(Some(&base), &store, 64, 64);
    assert_eq!(out.get_pixel(0, 0).0, WHITE);
    assert_eq!(out.get_pixel(32, 32).0, WHITE);
    assert_eq!(out.get_pixel(63, 63).0, WHITE);
}

#[test]
fn test_element_lands_in_placement_box() {
    let mut store = ElementStore::new();
    add_ready(&mut store, UvRect::new(0.25, 0.25, 0.5, 0.5), RED);

    let base = solid(16, 16, WHITE);
    let out = composite(Some(&base), &store, 64, 64);

    // Box spans pixels [16, 48); the center is artwork, corners are base
    assert_eq!(out.get_pixel(32, 32).0, RED);
    assert_eq!(out.get_pixel(4, 4).0, WHITE);
    assert_eq!(out.get_pixel(60, 60).0, WHITE);
}

#[test]
fn test_composite_is_deterministic() {
    let mut store = ElementStore::new();
    add_ready(&mut store, UvRect::new(0.1, 0.1, 0.4, 0.3), RED);
    add_ready(&mut store, UvRect::new(0.3, 0.2, 0.5, 0.5), BLUE);
    let base = solid(32, 32, WHITE);

    let first = composite(Some(&base), &store, 128, 128);
    let second = composite(Some(&base), &store, 128, 128);
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn test_z_order_later_element_on_top() {
    let mut store = ElementStore::new();
    add_ready(&mut store, UvRect::new(0.25, 0.25, 0.5, 0.5), RED);
    add_ready(&mut store, UvRect::new(0.375, 0.375, 0.5, 0.5), BLUE);

    let out = composite(None, &store, 64, 64);

    // (32, 32) sits deep inside both boxes; the later element wins
    assert_eq!(out.get_pixel(32, 32).0, BLUE);
    // (18, 18) is inside only the first element's box
    assert_eq!(out.get_pixel(18, 18).0, RED);
}

#[test]
fn test_z_reorder_changes_overlap() {
    let mut store = ElementStore::new();
    let red = add_ready(&mut store, UvRect::new(0.25, 0.25, 0.5, 0.5), RED);
    add_ready(&mut store, UvRect::new(0.375, 0.375, 0.5, 0.5), BLUE);

    store.bring_to_front(red);
    let out = composite(None, &store, 64, 64);
    assert_eq!(out.get_pixel(32, 32).0, RED);
}

#[test]
fn test_pending_element_is_omitted() {
    let mut store = ElementStore::new();
    let id = store.generate_id();
    store.insert(DesignElement::new(
        id,
        PartId::new("front"),
        UvRect::new(0.25, 0.25, 0.5, 0.5),
        ImageSlot::Pending {
            ticket: Uuid::new_v4(),
        },
    ));

    let out = composite(None, &store, 64, 64);
    assert_eq!(out.get_pixel(32, 32).0, [0, 0, 0, 0]);
}

#[test]
fn test_pending_element_appears_once_ready() {
    let mut store = ElementStore::new();
    let id = store.generate_id();
    store.insert(DesignElement::new(
        id,
        PartId::new("front"),
        UvRect::new(0.25, 0.25, 0.5, 0.5),
        ImageSlot::Pending {
            ticket: Uuid::new_v4(),
        },
    ));

    store
        .get_mut(id)
        .unwrap()
        .set_image(ImageSlot::Ready(Arc::new(solid(8, 8, RED))));

    let out = composite(None, &store, 64, 64);
    assert_eq!(out.get_pixel(32, 32).0, RED);
}

#[test]
fn test_opacity_blends_toward_base() {
    let mut store = ElementStore::new();
    let id = add_ready(&mut store, UvRect::new(0.0, 0.0, 1.0, 1.0), [0, 0, 0, 255]);
    store.get_mut(id).unwrap().set_opacity(0.5).unwrap();

    let base = solid(16, 16, WHITE);
    let out = composite(Some(&base), &store, 64, 64);

    let [r, g, b, a] = out.get_pixel(32, 32).0;
    assert_eq!(a, 255);
    // Half-opaque black over white sits near mid-grey
    for channel in [r, g, b] {
        assert!((120..=135).contains(&channel), "channel {} not mid-grey", channel);
    }
}

#[test]
fn test_rotation_fills_center() {
    let mut store = ElementStore::new();
    let id = add_ready(&mut store, UvRect::new(0.25, 0.25, 0.5, 0.5), RED);
    store.get_mut(id).unwrap().set_rotation_degrees(45.0).unwrap();

    let out = composite(None, &store, 64, 64);

    // Rotation about the box center keeps the center red, while the box
    // corners rotate out of coverage
    assert_eq!(out.get_pixel(32, 32).0, RED);
    assert_eq!(out.get_pixel(17, 17).0, [0, 0, 0, 0]);
}

#[test]
fn test_rotation_is_deterministic() {
    let mut store = ElementStore::new();
    let id = add_ready(&mut store, UvRect::new(0.2, 0.2, 0.5, 0.4), RED);
    store.get_mut(id).unwrap().set_rotation_degrees(30.0).unwrap();

    let first = composite(None, &store, 128, 128);
    let second = composite(None, &store, 128, 128);
    assert_eq!(first.as_raw(), second.as_raw());
}
