//! Export payload: the flat, loosely-typed object list both formatters consume.
//!
//! Every field has a default so payloads produced by other tools (or hand-written) parse
//! even when optional parts are missing.

use serde::{Deserialize, Serialize};

use crate::config::ExportOptions;
use crate::data::ComponentKind;
use crate::document::{AnnotationDocument, ObjectRecord};
use crate::error::ExportError;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportPayload {
    pub scene: String,
    /// None when the key is absent; validation rejects both None and an empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<PayloadObject>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PayloadObject {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<PayloadTag>,
    pub location: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_annotations: Option<Vec<PayloadRegion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_tracks: Option<Vec<PayloadTrack>>,
}

impl Default for PayloadObject {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            tags: Vec::new(),
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            mesh_annotations: None,
            animation_tracks: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PayloadTag {
    pub name: String,
    pub color: Vec<f32>,
}

impl Default for PayloadTag {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: vec![1.0, 1.0, 1.0],
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PayloadRegion {
    pub tag: String,
    pub vertices: Vec<u32>,
    pub edges: Vec<u32>,
    pub faces: Vec<u32>,
}

impl PayloadRegion {
    pub fn indices(&self, kind: ComponentKind) -> &[u32] {
        match kind {
            ComponentKind::Vertices => &self.vertices,
            ComponentKind::Edges => &self.edges,
            ComponentKind::Faces => &self.faces,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PayloadTrack {
    pub name: String,
    pub property: String,
    pub keyframes: Vec<PayloadKeyframe>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PayloadKeyframe {
    pub frame: i32,
    pub value: Vec<f32>,
    pub interpolation: String,
}

impl Default for PayloadKeyframe {
    fn default() -> Self {
        Self {
            frame: 0,
            value: vec![0.0; 3],
            interpolation: "LINEAR".to_string(),
        }
    }
}

impl ExportPayload {
    pub fn from_json_str(s: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn objects(&self) -> &[PayloadObject] {
        self.objects.as_deref().unwrap_or(&[])
    }

    /// Reject payloads that have nothing to export.
    pub fn validate(&self) -> Result<(), ExportError> {
        match &self.objects {
            Some(objects) if !objects.is_empty() => Ok(()),
            _ => Err(ExportError::Validation("No objects found in data".into())),
        }
    }
}

impl PayloadObject {
    pub fn from_record(record: &ObjectRecord, options: ExportOptions) -> Self {
        let mut obj = PayloadObject {
            name: record.name.clone(),
            kind: record.kind.to_string(),
            location: record.transform.location,
            rotation: record.transform.rotation,
            scale: record.transform.scale,
            ..PayloadObject::default()
        };
        let Some(annotation) = record.annotation() else {
            return obj;
        };
        obj.tags = annotation
            .tags
            .iter()
            .map(|t| PayloadTag {
                name: t.name.clone(),
                color: t.color.components().to_vec(),
            })
            .collect();

        if options.include_mesh && record.kind.is_mesh() {
            obj.mesh_annotations = Some(
                annotation
                    .mesh_annotations
                    .iter()
                    .map(|r| PayloadRegion {
                        tag: r.tag.clone(),
                        vertices: r.vertex_indices.iter().copied().collect(),
                        edges: r.edge_indices.iter().copied().collect(),
                        faces: r.face_indices.iter().copied().collect(),
                    })
                    .collect(),
            );
        }

        if options.include_animation && !annotation.animation_tracks.is_empty() {
            obj.animation_tracks = Some(
                annotation
                    .animation_tracks
                    .iter()
                    .map(|t| PayloadTrack {
                        name: t.name.clone(),
                        property: t.property_path.clone(),
                        keyframes: t
                            .keyframes
                            .iter()
                            .map(|k| PayloadKeyframe {
                                frame: k.frame,
                                value: k.value.to_slot(),
                                interpolation: k.interpolation.to_string(),
                            })
                            .collect(),
                    })
                    .collect(),
            );
        }
        obj
    }
}

impl AnnotationDocument {
    /// Payload of every object carrying at least one tag, in registration order.
    pub fn export_payload(&self, options: ExportOptions) -> ExportPayload {
        let objects = self
            .annotated_objects()
            .filter(|r| r.annotation().is_some_and(|a| !a.tags.is_empty()))
            .map(|r| PayloadObject::from_record(r, options))
            .collect();
        ExportPayload {
            scene: self.scene.clone(),
            objects: Some(objects),
        }
    }
}
