use garmentstudio_core::geometry::{UvPoint, UvRect};
use garmentstudio_designer::parts::{GarmentPart, PartId, PartLayout, PartRegistry};

fn overlapping_layout() -> PartLayout {
    // A catch-all body region underneath two specific arm regions.
    PartLayout {
        parts: vec![
            GarmentPart {
                id: PartId::new("body"),
                label: "Body".to_string(),
                region: UvRect::new(0.0, 0.0, 1.0, 1.0),
                placement: UvRect::new(0.4, 0.4, 0.2, 0.2),
                priority: 20,
            },
            GarmentPart {
                id: PartId::new("left-arm"),
                label: "Left arm".to_string(),
                region: UvRect::new(0.0, 0.5, 0.5, 0.5),
                placement: UvRect::new(0.1, 0.6, 0.1, 0.1),
                priority: 10,
            },
            GarmentPart {
                id: PartId::new("right-arm"),
                label: "Right arm".to_string(),
                region: UvRect::new(0.5, 0.5, 0.5, 0.5),
                placement: UvRect::new(0.6, 0.6, 0.1, 0.1),
                priority: 10,
            },
        ],
    }
}

#[test]
fn test_default_layout_has_four_parts() {
    let registry = PartRegistry::default();
    assert_eq!(registry.len(), 4);
    for id in ["front", "back", "left-arm", "right-arm"] {
        assert!(registry.get(&PartId::new(id)).is_some(), "missing {}", id);
    }
}

#[test]
fn test_default_front_placement() {
    let registry = PartRegistry::default();
    let placement = registry.placement(&PartId::new("front")).unwrap();
    assert_eq!(placement, UvRect::new(0.25, 0.3, 0.15, 0.2));
}

#[test]
fn test_hit_test_finds_part() {
    let registry = PartRegistry::default();
    let part = registry.hit_test(UvPoint::new(0.25, 0.25)).unwrap();
    assert_eq!(part.id, PartId::new("front"));
}

#[test]
fn test_hit_test_outside_all_regions() {
    let layout = overlapping_layout();
    let mut parts = layout.parts;
    parts.remove(0); // Drop the catch-all; only arm regions remain
    let registry = PartRegistry::from_layout(PartLayout { parts }).unwrap();
    assert!(registry.hit_test(UvPoint::new(0.25, 0.25)).is_none());
}

#[test]
fn test_overlap_resolved_by_priority() {
    let registry = PartRegistry::from_layout(overlapping_layout()).unwrap();

    // Inside both the catch-all and the left arm; the arm's lower priority
    // value wins.
    let part = registry.hit_test(UvPoint::new(0.25, 0.75)).unwrap();
    assert_eq!(part.id, PartId::new("left-arm"));

    // Only the catch-all covers the chest area.
    let part = registry.hit_test(UvPoint::new(0.5, 0.25)).unwrap();
    assert_eq!(part.id, PartId::new("body"));
}

#[test]
fn test_set_placement() {
    let mut registry = PartRegistry::default();
    let id = PartId::new("front");
    let rect = UvRect::new(0.1, 0.1, 0.3, 0.3);
    registry.set_placement(&id, rect).unwrap();
    assert_eq!(registry.placement(&id), Some(rect));
}

#[test]
fn test_set_placement_rejects_out_of_bounds() {
    let mut registry = PartRegistry::default();
    let id = PartId::new("front");
    let before = registry.placement(&id).unwrap();

    assert!(registry.set_placement(&id, UvRect::new(0.9, 0.9, 0.2, 0.2)).is_err());
    assert!(registry.set_placement(&id, UvRect::new(0.1, 0.1, 0.0, 0.2)).is_err());
    assert!(registry
        .set_placement(&id, UvRect::new(f64::NAN, 0.1, 0.1, 0.2))
        .is_err());

    // Rejected mutations leave the registry untouched
    assert_eq!(registry.placement(&id), Some(before));
}

#[test]
fn test_set_placement_unknown_part() {
    let mut registry = PartRegistry::default();
    let err = registry
        .set_placement(&PartId::new("hood"), UvRect::new(0.1, 0.1, 0.2, 0.2))
        .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_layout_rejects_duplicate_ids() {
    let mut layout = overlapping_layout();
    let mut dup = layout.parts[1].clone();
    dup.region = UvRect::new(0.0, 0.0, 0.2, 0.2);
    layout.parts.push(dup);
    assert!(PartRegistry::from_layout(layout).is_err());
}

#[test]
fn test_layout_rejects_empty() {
    assert!(PartRegistry::from_layout(PartLayout { parts: vec![] }).is_err());
}

#[test]
fn test_layout_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");

    let layout = overlapping_layout();
    layout.save_to_file(&path).unwrap();

    let loaded = PartLayout::load_from_file(&path).unwrap();
    assert_eq!(loaded.parts, layout.parts);
}

#[test]
fn test_layout_file_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(PartLayout::load_from_file(&path).is_err());
}
