//! Structured (JSON) export document.

use serde::{Deserialize, Serialize};

use super::payload::{ExportPayload, PayloadObject};
use super::ExportContext;
use crate::error::ExportError;

/// Schema tag written into every structured export.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredDocument {
    pub format_version: String,
    pub blender_version: String,
    pub timestamp: String,
    pub scene: String,
    pub objects: Vec<StructuredObject>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredObject {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<StructuredTag>,
    pub transform: StructuredTransform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_annotations: Option<Vec<StructuredRegion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Vec<StructuredTrack>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredTag {
    pub name: String,
    pub color: Vec<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredTransform {
    pub location: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredRegion {
    pub tag: String,
    pub components: StructuredComponents,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredComponents {
    pub vertices: Vec<u32>,
    pub edges: Vec<u32>,
    pub faces: Vec<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredTrack {
    pub track_name: String,
    pub property: String,
    pub keyframes: Vec<StructuredKeyframe>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuredKeyframe {
    pub frame: i32,
    pub value: Vec<f32>,
    pub interpolation: String,
}

fn structured_object(obj: &PayloadObject) -> StructuredObject {
    StructuredObject {
        name: obj.name.clone(),
        kind: obj.kind.clone(),
        tags: obj
            .tags
            .iter()
            .map(|t| StructuredTag {
                name: t.name.clone(),
                color: t.color.clone(),
            })
            .collect(),
        transform: StructuredTransform {
            location: obj.location,
            rotation: obj.rotation,
            scale: obj.scale,
        },
        mesh_annotations: obj.mesh_annotations.as_ref().map(|regions| {
            regions
                .iter()
                .map(|r| StructuredRegion {
                    tag: r.tag.clone(),
                    components: StructuredComponents {
                        vertices: r.vertices.clone(),
                        edges: r.edges.clone(),
                        faces: r.faces.clone(),
                    },
                })
                .collect()
        }),
        animation: obj.animation_tracks.as_ref().map(|tracks| {
            tracks
                .iter()
                .map(|t| StructuredTrack {
                    track_name: t.name.clone(),
                    property: t.property.clone(),
                    keyframes: t
                        .keyframes
                        .iter()
                        .map(|k| StructuredKeyframe {
                            frame: k.frame,
                            value: k.value.clone(),
                            interpolation: k.interpolation.clone(),
                        })
                        .collect(),
                })
                .collect()
        }),
    }
}

/// Build the structured document. Fails on payloads that do not validate.
pub fn format_structured(
    payload: &ExportPayload,
    ctx: &ExportContext,
) -> Result<StructuredDocument, ExportError> {
    payload.validate()?;
    Ok(StructuredDocument {
        format_version: FORMAT_VERSION.to_string(),
        blender_version: ctx.host_version.clone(),
        timestamp: ctx.resolved_timestamp(),
        scene: payload.scene.clone(),
        objects: payload.objects().iter().map(structured_object).collect(),
    })
}

/// Pretty-printed with two-space indentation.
pub fn render_structured(payload: &ExportPayload, ctx: &ExportContext) -> Result<String, ExportError> {
    let doc = format_structured(payload, ctx)?;
    Ok(serde_json::to_string_pretty(&doc)?)
}
