use std::collections::BTreeSet;

use tagrig_annotation_core::{
    AnnotationDocument, AnnotationError, Color, ComponentSelection, MeshTopology, ObjectKind,
    RegionIssue,
};

#[test]
fn merge_yields_union_of_all_regions_with_tag() {
    let mut doc = AnnotationDocument::new("Scene");
    let id = doc.register_mesh("Car", MeshTopology::new(100, 200, 90));
    let record = doc.object_mut(id).unwrap();

    let parts: [&[u32]; 4] = [&[1, 2, 3], &[3, 4], &[50], &[2, 99]];
    let mut expected = BTreeSet::new();
    for (i, verts) in parts.iter().enumerate() {
        record
            .add_region_annotation(
                "wheel",
                ComponentSelection::new()
                    .vertices(verts.iter().copied())
                    .faces([i as u32]),
            )
            .unwrap();
        expected.extend(verts.iter().copied());
    }
    record
        .add_region_annotation("door", ComponentSelection::new().edges([7]))
        .unwrap();

    assert!(record.merge_region_annotations("wheel").unwrap());

    let wheels: Vec<_> = record.regions_with_tag("wheel").collect();
    assert_eq!(wheels.len(), 1);
    assert_eq!(wheels[0].vertex_indices, expected);
    assert_eq!(wheels[0].face_indices, BTreeSet::from([0, 1, 2, 3]));
    assert_eq!(record.regions_with_tag("door").count(), 1);

    // Already merged: merging again keeps a single region.
    assert!(record.merge_region_annotations("wheel").unwrap());
    assert_eq!(record.regions_with_tag("wheel").count(), 1);
}

#[test]
fn non_mesh_objects_reject_regions_but_accept_tags() {
    let mut doc = AnnotationDocument::new("Scene");
    let id = doc.register_object("Rig", ObjectKind::Armature);
    let record = doc.object_mut(id).unwrap();

    record.add_tag("skeleton", Color::rgba(0.2, 0.2, 0.2, 1.0));
    let err = record
        .add_region_annotation("skeleton", ComponentSelection::new().vertices([0]))
        .unwrap_err();
    assert_eq!(err.category(), "target");
    let stats = record.annotation_stats().unwrap();
    assert_eq!(stats.tag_count, 1);
    assert_eq!(stats.mesh_annotation_count, 0);
}

#[test]
fn missing_object_is_reported() {
    let mut doc = AnnotationDocument::new("Scene");
    let id = doc.register_object("Gone", ObjectKind::Empty);
    doc.remove_object(id);
    assert!(matches!(
        doc.object_mut(id),
        Err(AnnotationError::ObjectNotFound { .. })
    ));
}

#[test]
fn edited_mesh_is_detected() {
    let mut doc = AnnotationDocument::new("Scene");
    let id = doc.register_mesh("Plane", MeshTopology::new(4, 4, 1));
    doc.object_mut(id)
        .unwrap()
        .add_region_annotation("corner", ComponentSelection::new().vertices([3]))
        .unwrap();

    let record = doc.object(id).unwrap();
    assert!(record.validate_regions(MeshTopology::new(4, 4, 1)).is_empty());

    doc.set_topology(id, MeshTopology::new(3, 3, 1)).unwrap();
    let record = doc.object(id).unwrap();
    let issues = record.validate_regions(record.topology.unwrap());
    assert_eq!(issues.len(), 2);
    assert!(issues.contains(&RegionIssue::OutOfRange {
        region: 0,
        kind: tagrig_annotation_core::ComponentKind::Vertices,
        index: 3,
        count: 3,
    }));
    assert!(record
        .resolve_region(0, MeshTopology::new(3, 3, 1))
        .unwrap()
        .is_empty());
}

#[test]
fn shot_document_fixture_loads_and_saves() {
    let path = tagrig_test_fixtures::documents::path("shot010").unwrap();
    let mut doc = AnnotationDocument::load(&path).unwrap();
    assert_eq!(doc.scene, "shot010");
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.annotated_objects().count(), 1);

    let cube = doc.find_by_name("Cube").unwrap();
    let record = doc.object(cube).unwrap();
    assert_eq!(record.tag("wheel").unwrap().color, Color::Rgb([1.0, 0.0, 0.0]));
    assert_eq!(record.frame_range(), Some((1, 9)));
    assert!(record.dangling_region_tags().is_empty());

    // Loaded ids are never handed out again.
    let fresh = doc.register_object("Light", ObjectKind::Light);
    assert_eq!(fresh.0, 4);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("shot010.json");
    doc.save(&out).unwrap();
    let reloaded = AnnotationDocument::load(&out).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.object(cube), doc.object(cube));
}
