//! Tag and mesh-region operations on an object record.

use std::collections::BTreeSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::data::{Color, ComponentKind, MeshTopology, RegionAnnotation, Tag};
use crate::document::ObjectRecord;
use crate::error::AnnotationError;

/// Which component kinds the host's selection mode currently exposes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectMode {
    pub vertex: bool,
    pub edge: bool,
    pub face: bool,
}

impl Default for SelectMode {
    fn default() -> Self {
        Self {
            vertex: true,
            edge: true,
            face: true,
        }
    }
}

/// Component indices picked by the host, ready to become a region.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentSelection {
    pub vertices: BTreeSet<u32>,
    pub edges: BTreeSet<u32>,
    pub faces: BTreeSet<u32>,
}

impl ComponentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.vertices.extend(indices);
        self
    }

    pub fn edges(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.edges.extend(indices);
        self
    }

    pub fn faces(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.faces.extend(indices);
        self
    }

    /// Drop the kinds the select mode does not expose.
    pub fn restrict(mut self, mode: SelectMode) -> Self {
        if !mode.vertex {
            self.vertices.clear();
        }
        if !mode.edge {
            self.edges.clear();
        }
        if !mode.face {
            self.faces.clear();
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationStats {
    pub tag_count: usize,
    pub tags: Vec<String>,
    pub mesh_annotation_count: usize,
    pub components: ComponentCounts,
}

/// Problem found when checking stored regions against the current mesh.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegionIssue {
    /// The mesh changed shape since the region was recorded.
    TopologyChanged {
        region: usize,
        recorded: MeshTopology,
        current: MeshTopology,
    },
    /// An index no longer exists on the mesh.
    OutOfRange {
        region: usize,
        kind: ComponentKind,
        index: u32,
        count: u32,
    },
}

impl ObjectRecord {
    /// Append a tag. Names are not checked for uniqueness.
    pub fn add_tag(&mut self, name: impl Into<String>, color: Color) -> &Tag {
        let annotation = self.ensure_annotation();
        annotation.tags.push(Tag::new(name, color));
        let idx = annotation.tags.len() - 1;
        &annotation.tags[idx]
    }

    /// Recolor the first tag called `name`, or append it when missing.
    pub fn set_tag(&mut self, name: &str, color: Color) -> &Tag {
        let annotation = self.ensure_annotation();
        let idx = match annotation.tags.iter().position(|t| t.name == name) {
            Some(idx) => {
                annotation.tags[idx].color = color;
                idx
            }
            None => {
                annotation.tags.push(Tag::new(name, color));
                annotation.tags.len() - 1
            }
        };
        &annotation.tags[idx]
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.annotation()?.tags.iter().find(|t| t.name == name)
    }

    /// Remove the first tag called `name`. Regions referencing it are left alone.
    pub fn remove_tag(&mut self, name: &str) -> bool {
        let Some(annotation) = self.annotation.as_mut() else {
            return false;
        };
        match annotation.tags.iter().position(|t| t.name == name) {
            Some(idx) => {
                annotation.tags.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Record a region on a mesh object. Indices are stored as given; they are only
    /// checked against the mesh by [`ObjectRecord::validate_regions`] and
    /// [`ObjectRecord::resolve_region`].
    pub fn add_region_annotation(
        &mut self,
        tag: impl Into<String>,
        selection: ComponentSelection,
    ) -> Result<&RegionAnnotation, AnnotationError> {
        self.require_mesh()?;
        let region = RegionAnnotation {
            tag: tag.into(),
            vertex_indices: selection.vertices,
            edge_indices: selection.edges,
            face_indices: selection.faces,
            topology: self.topology,
        };
        debug!(
            "'{}': region '{}' with {} components",
            self.name,
            region.tag,
            region.component_count()
        );
        let annotation = self.ensure_annotation();
        annotation.mesh_annotations.push(region);
        let idx = annotation.mesh_annotations.len() - 1;
        Ok(&annotation.mesh_annotations[idx])
    }

    pub fn remove_region_annotation(&mut self, index: usize) -> Option<RegionAnnotation> {
        let regions = &mut self.annotation.as_mut()?.mesh_annotations;
        (index < regions.len()).then(|| regions.remove(index))
    }

    pub fn regions_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a RegionAnnotation> + 'a {
        self.annotation
            .iter()
            .flat_map(|a| a.mesh_annotations.iter())
            .filter(move |r| r.tag == tag)
    }

    /// Union every region tagged `tag` into one region appended at the end.
    ///
    /// Returns Ok(false) when nothing matched or the union is empty; matched empty
    /// regions are still removed in that case.
    pub fn merge_region_annotations(&mut self, tag: &str) -> Result<bool, AnnotationError> {
        self.require_mesh()?;
        let Some(annotation) = self.annotation.as_mut() else {
            return Ok(false);
        };

        let mut merged = RegionAnnotation::new(tag);
        let mut fingerprints: Vec<Option<MeshTopology>> = Vec::new();
        let mut matched = 0usize;
        annotation.mesh_annotations.retain(|region| {
            if region.tag != tag {
                return true;
            }
            matched += 1;
            for kind in ComponentKind::ALL {
                merged.indices_mut(kind).extend(region.indices(kind).iter().copied());
            }
            fingerprints.push(region.topology);
            false
        });

        if matched == 0 || merged.is_empty() {
            return Ok(false);
        }
        merged.topology = match fingerprints.split_first() {
            Some((first, rest)) if rest.iter().all(|f| f == first) => *first,
            _ => None,
        };
        debug!(
            "'{}': merged {} regions tagged '{}' ({} components)",
            self.name,
            matched,
            tag,
            merged.component_count()
        );
        annotation.mesh_annotations.push(merged);
        Ok(true)
    }

    pub fn annotation_stats(&self) -> Option<AnnotationStats> {
        let annotation = self.annotation()?;
        let mut stats = AnnotationStats {
            tag_count: annotation.tags.len(),
            tags: annotation.tags.iter().map(|t| t.name.clone()).collect(),
            ..AnnotationStats::default()
        };
        if self.kind.is_mesh() {
            stats.mesh_annotation_count = annotation.mesh_annotations.len();
            for region in &annotation.mesh_annotations {
                stats.components.vertices += region.vertex_indices.len();
                stats.components.edges += region.edge_indices.len();
                stats.components.faces += region.face_indices.len();
            }
        }
        Some(stats)
    }

    /// Region tags that name no existing tag.
    pub fn dangling_region_tags(&self) -> BTreeSet<String> {
        let Some(annotation) = self.annotation() else {
            return BTreeSet::new();
        };
        annotation
            .mesh_annotations
            .iter()
            .filter(|r| !annotation.tags.iter().any(|t| t.name == r.tag))
            .map(|r| r.tag.clone())
            .collect()
    }

    /// Copy of region `index` restricted to indices that exist on `topology`.
    pub fn resolve_region(&self, index: usize, topology: MeshTopology) -> Option<RegionAnnotation> {
        let region = self.annotation()?.mesh_annotations.get(index)?;
        let mut resolved = RegionAnnotation::new(region.tag.clone());
        resolved.topology = Some(topology);
        for kind in ComponentKind::ALL {
            let count = topology.count(kind);
            let kept = resolved.indices_mut(kind);
            kept.extend(region.indices(kind).range(..count).copied());
        }
        let dropped = region.component_count() - resolved.component_count();
        if dropped > 0 {
            warn!(
                "'{}': region {} has {} indices outside the current mesh",
                self.name, index, dropped
            );
        }
        Some(resolved)
    }

    /// Check every stored region against the mesh's current component counts.
    pub fn validate_regions(&self, topology: MeshTopology) -> Vec<RegionIssue> {
        let Some(annotation) = self.annotation() else {
            return Vec::new();
        };
        let mut issues = Vec::new();
        for (region_idx, region) in annotation.mesh_annotations.iter().enumerate() {
            if let Some(recorded) = region.topology {
                if recorded != topology {
                    issues.push(RegionIssue::TopologyChanged {
                        region: region_idx,
                        recorded,
                        current: topology,
                    });
                }
            }
            for kind in ComponentKind::ALL {
                let count = topology.count(kind);
                issues.extend(region.indices(kind).range(count..).map(|&index| {
                    RegionIssue::OutOfRange {
                        region: region_idx,
                        kind,
                        index,
                        count,
                    }
                }));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ObjectKind;
    use crate::ids::ObjectId;

    fn mesh() -> ObjectRecord {
        let mut record = ObjectRecord::new(ObjectId(0), "Cube", ObjectKind::Mesh);
        record.topology = Some(MeshTopology::new(8, 12, 6));
        record
    }

    #[test]
    fn duplicate_tags_allowed_and_first_removed() {
        let mut record = mesh();
        record.add_tag("wheel", Color::rgb(1.0, 0.0, 0.0));
        record.add_tag("wheel", Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(record.annotation().unwrap().tags.len(), 2);
        assert!(record.remove_tag("wheel"));
        let tags = &record.annotation().unwrap().tags;
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].color, Color::Rgb([0.0, 1.0, 0.0]));
        assert!(record.remove_tag("wheel"));
        assert!(!record.remove_tag("wheel"));
    }

    #[test]
    fn set_tag_replaces_by_name() {
        let mut record = mesh();
        record.set_tag("door", Color::WHITE);
        record.set_tag("door", Color::rgb(0.0, 0.0, 1.0));
        assert_eq!(record.annotation().unwrap().tags.len(), 1);
        assert_eq!(record.tag("door").unwrap().color, Color::Rgb([0.0, 0.0, 1.0]));
    }

    #[test]
    fn remove_tag_on_unannotated_object() {
        let mut record = mesh();
        assert!(!record.remove_tag("anything"));
        assert!(!record.has_annotation());
    }

    #[test]
    fn regions_require_mesh() {
        let mut cam = ObjectRecord::new(ObjectId(1), "Camera", ObjectKind::Camera);
        let err = cam
            .add_region_annotation("lens", ComponentSelection::new().vertices([0]))
            .unwrap_err();
        assert!(matches!(err, AnnotationError::NotMesh { .. }));
        assert!(!cam.has_annotation());
        assert!(cam.merge_region_annotations("lens").is_err());
    }

    #[test]
    fn merge_unions_and_replaces() {
        let mut record = mesh();
        record
            .add_region_annotation("wheel", ComponentSelection::new().vertices([0, 1]).faces([2]))
            .unwrap();
        record
            .add_region_annotation("body", ComponentSelection::new().vertices([5]))
            .unwrap();
        record
            .add_region_annotation("wheel", ComponentSelection::new().vertices([1, 3]).edges([4]))
            .unwrap();

        assert!(record.merge_region_annotations("wheel").unwrap());
        let regions = &record.annotation().unwrap().mesh_annotations;
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].tag, "body");
        let merged = &regions[1];
        assert_eq!(merged.vertex_indices, BTreeSet::from([0, 1, 3]));
        assert_eq!(merged.edge_indices, BTreeSet::from([4]));
        assert_eq!(merged.face_indices, BTreeSet::from([2]));
        assert_eq!(merged.topology, Some(MeshTopology::new(8, 12, 6)));

        assert!(!record.merge_region_annotations("missing").unwrap());
    }

    #[test]
    fn merge_of_empty_regions_reports_false() {
        let mut record = mesh();
        record
            .add_region_annotation("ghost", ComponentSelection::new())
            .unwrap();
        assert!(!record.merge_region_annotations("ghost").unwrap());
        assert!(record.annotation().unwrap().mesh_annotations.is_empty());
    }

    #[test]
    fn stats_count_components() {
        let mut record = mesh();
        record.add_tag("wheel", Color::WHITE);
        record
            .add_region_annotation("wheel", ComponentSelection::new().vertices([0, 1, 2]).faces([0]))
            .unwrap();
        let stats = record.annotation_stats().unwrap();
        assert_eq!(stats.tag_count, 1);
        assert_eq!(stats.tags, vec!["wheel".to_string()]);
        assert_eq!(stats.mesh_annotation_count, 1);
        assert_eq!(
            stats.components,
            ComponentCounts {
                vertices: 3,
                edges: 0,
                faces: 1
            }
        );
        assert!(ObjectRecord::new(ObjectId(5), "Empty", ObjectKind::Empty)
            .annotation_stats()
            .is_none());
    }

    #[test]
    fn dangling_tags_are_reported_not_fatal() {
        let mut record = mesh();
        record.add_tag("wheel", Color::WHITE);
        record
            .add_region_annotation("wheel", ComponentSelection::new().vertices([0]))
            .unwrap();
        assert!(record.dangling_region_tags().is_empty());
        record.remove_tag("wheel");
        assert_eq!(
            record.dangling_region_tags(),
            BTreeSet::from(["wheel".to_string()])
        );
        assert_eq!(record.regions_with_tag("wheel").count(), 1);
    }

    #[test]
    fn topology_checks() {
        let mut record = mesh();
        record
            .add_region_annotation("top", ComponentSelection::new().vertices([1, 7, 9]).faces([5]))
            .unwrap();
        let same = MeshTopology::new(8, 12, 6);
        assert_eq!(
            record.validate_regions(same),
            vec![RegionIssue::OutOfRange {
                region: 0,
                kind: ComponentKind::Vertices,
                index: 9,
                count: 8
            }]
        );

        let shrunk = MeshTopology::new(4, 6, 2);
        let issues = record.validate_regions(shrunk);
        assert!(matches!(issues[0], RegionIssue::TopologyChanged { region: 0, .. }));
        assert_eq!(issues.len(), 4);

        let resolved = record.resolve_region(0, shrunk).unwrap();
        assert_eq!(resolved.vertex_indices, BTreeSet::from([1]));
        assert!(resolved.face_indices.is_empty());
        assert!(record.resolve_region(3, shrunk).is_none());
    }

    #[test]
    fn selection_respects_select_mode() {
        let sel = ComponentSelection::new()
            .vertices([1])
            .edges([2])
            .faces([3])
            .restrict(SelectMode {
                vertex: true,
                edge: false,
                face: false,
            });
        assert_eq!(sel.vertices.len(), 1);
        assert!(sel.edges.is_empty() && sel.faces.is_empty());
        assert!(!sel.is_empty());
    }

    #[test]
    fn remove_region_by_index() {
        let mut record = mesh();
        assert!(record.remove_region_annotation(0).is_none());
        record
            .add_region_annotation("a", ComponentSelection::new().vertices([0]))
            .unwrap();
        assert!(record.remove_region_annotation(1).is_none());
        assert_eq!(record.remove_region_annotation(0).unwrap().tag, "a");
    }
}
