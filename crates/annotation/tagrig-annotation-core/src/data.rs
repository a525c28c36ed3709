//! Canonical annotation data model (ObjectAnnotation and its parts).
//! Value/Interpolation are defined in value.rs.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{Interpolation, Value};

/// Tag color, RGB or RGBA, components in [0,1].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Color {
    Rgb([f32; 3]),
    Rgba([f32; 4]),
}

impl Color {
    pub const WHITE: Color = Color::Rgb([1.0, 1.0, 1.0]);

    /// Build an RGB color, clamping every component into [0,1].
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::Rgb([unit(r), unit(g), unit(b)])
    }

    /// Build an RGBA color, clamping every component into [0,1].
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color::Rgba([unit(r), unit(g), unit(b), unit(a)])
    }

    /// Accepts 3 or 4 components; anything else is rejected.
    pub fn from_components(c: &[f32]) -> Option<Self> {
        match *c {
            [r, g, b] => Some(Color::rgb(r, g, b)),
            [r, g, b, a] => Some(Color::rgba(r, g, b, a)),
            _ => None,
        }
    }

    pub fn components(&self) -> &[f32] {
        match self {
            Color::Rgb(c) => c,
            Color::Rgba(c) => c,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Named, colored label attached to an object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub color: Color,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Mesh component categories a region can reference.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Vertices,
    Edges,
    Faces,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::Vertices,
        ComponentKind::Edges,
        ComponentKind::Faces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Vertices => "vertices",
            ComponentKind::Edges => "edges",
            ComponentKind::Faces => "faces",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component counts of a mesh at a point in time. Used as a structural fingerprint.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeshTopology {
    pub vertices: u32,
    pub edges: u32,
    pub faces: u32,
}

impl MeshTopology {
    pub fn new(vertices: u32, edges: u32, faces: u32) -> Self {
        Self {
            vertices,
            edges,
            faces,
        }
    }

    #[inline]
    pub fn count(&self, kind: ComponentKind) -> u32 {
        match kind {
            ComponentKind::Vertices => self.vertices,
            ComponentKind::Edges => self.edges,
            ComponentKind::Faces => self.faces,
        }
    }
}

/// A tag bound to a set of mesh component indices.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RegionAnnotation {
    /// Tag name; a reference by name only, it may not exist in the tag list.
    pub tag: String,
    #[serde(default)]
    pub vertex_indices: BTreeSet<u32>,
    #[serde(default)]
    pub edge_indices: BTreeSet<u32>,
    #[serde(default)]
    pub face_indices: BTreeSet<u32>,
    /// Mesh component counts observed when the region was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<MeshTopology>,
}

impl RegionAnnotation {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn indices(&self, kind: ComponentKind) -> &BTreeSet<u32> {
        match kind {
            ComponentKind::Vertices => &self.vertex_indices,
            ComponentKind::Edges => &self.edge_indices,
            ComponentKind::Faces => &self.face_indices,
        }
    }

    #[inline]
    pub fn indices_mut(&mut self, kind: ComponentKind) -> &mut BTreeSet<u32> {
        match kind {
            ComponentKind::Vertices => &mut self.vertex_indices,
            ComponentKind::Edges => &mut self.edge_indices,
            ComponentKind::Faces => &mut self.face_indices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_indices.is_empty() && self.edge_indices.is_empty() && self.face_indices.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.vertex_indices.len() + self.edge_indices.len() + self.face_indices.len()
    }
}

/// A single captured sample.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub frame: i32,
    pub value: Value,
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Bezier handles as (frame, value) points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_left: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_right: Option<[f32; 2]>,
}

impl Keyframe {
    pub fn new(frame: i32, value: impl Into<Value>, interpolation: Interpolation) -> Self {
        Self {
            frame,
            value: value.into(),
            interpolation,
            handle_left: None,
            handle_right: None,
        }
    }

    pub fn with_handles(mut self, left: [f32; 2], right: [f32; 2]) -> Self {
        self.handle_left = Some(left);
        self.handle_right = Some(right);
        self
    }
}

/// One animated channel: samples for a (property, sub-channel) pair.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimationTrack {
    /// Display name, conventionally "<property_path>[<array_index>]".
    pub name: String,
    pub property_path: String,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    pub fn new(name: impl Into<String>, property_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_path: property_path.into(),
            keyframes: Vec::new(),
        }
    }

    /// (min, max) keyframe frame, None for an empty track.
    pub fn frame_range(&self) -> Option<(i32, i32)> {
        let first = self.keyframes.first()?.frame;
        Some(
            self.keyframes
                .iter()
                .fold((first, first), |(lo, hi), kf| (lo.min(kf.frame), hi.max(kf.frame))),
        )
    }
}

/// Aggregate root for everything recorded about one object.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ObjectAnnotation {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub mesh_annotations: Vec<RegionAnnotation>,
    #[serde(default)]
    pub animation_tracks: Vec<AnimationTrack>,
    /// Free-form string (JSON by convention); not interpreted by the core.
    #[serde(default)]
    pub metadata: String,
}

/// Host object type, spelled the way host editors report it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    Mesh,
    Curve,
    Armature,
    Empty,
    Camera,
    Light,
    Other(String),
}

impl ObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Mesh => "MESH",
            ObjectKind::Curve => "CURVE",
            ObjectKind::Armature => "ARMATURE",
            ObjectKind::Empty => "EMPTY",
            ObjectKind::Camera => "CAMERA",
            ObjectKind::Light => "LIGHT",
            ObjectKind::Other(s) => s,
        }
    }

    #[inline]
    pub fn is_mesh(&self) -> bool {
        matches!(self, ObjectKind::Mesh)
    }
}

impl From<String> for ObjectKind {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "MESH" => ObjectKind::Mesh,
            "CURVE" => ObjectKind::Curve,
            "ARMATURE" => ObjectKind::Armature,
            "EMPTY" => ObjectKind::Empty,
            "CAMERA" => ObjectKind::Camera,
            "LIGHT" => ObjectKind::Light,
            _ => ObjectKind::Other(s),
        }
    }
}

impl From<&str> for ObjectKind {
    fn from(s: &str) -> Self {
        ObjectKind::from(s.to_string())
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object transform as reported by the host (Euler rotation in radians).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub location: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_clamps_and_parses() {
        assert_eq!(Color::rgb(1.5, -0.2, 0.5), Color::Rgb([1.0, 0.0, 0.5]));
        assert_eq!(Color::from_components(&[0.1, 0.2]), None);
        let c: Color = serde_json::from_str("[1.0, 0.0, 0.0, 0.5]").unwrap();
        assert_eq!(c, Color::Rgba([1.0, 0.0, 0.0, 0.5]));
        let c: Color = serde_json::from_str("[1.0, 0.0, 0.0]").unwrap();
        assert_eq!(c.components(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn object_kind_strings() {
        assert_eq!(ObjectKind::from("mesh"), ObjectKind::Mesh);
        assert_eq!(
            ObjectKind::from("GPENCIL"),
            ObjectKind::Other("GPENCIL".into())
        );
        let json = serde_json::to_string(&ObjectKind::Camera).unwrap();
        assert_eq!(json, "\"CAMERA\"");
    }

    #[test]
    fn track_frame_range_uses_min_max() {
        let mut track = AnimationTrack::new("location[0]", "location");
        assert_eq!(track.frame_range(), None);
        track.keyframes.push(Keyframe::new(5, 1.0, Interpolation::Linear));
        track.keyframes.push(Keyframe::new(2, 1.0, Interpolation::Linear));
        track.keyframes.push(Keyframe::new(9, 1.0, Interpolation::Linear));
        assert_eq!(track.frame_range(), Some((2, 9)));
    }

    #[test]
    fn region_component_access() {
        let mut region = RegionAnnotation::new("wheel");
        assert!(region.is_empty());
        region.indices_mut(ComponentKind::Faces).extend([3, 1, 3]);
        assert_eq!(region.component_count(), 2);
        assert_eq!(
            region.indices(ComponentKind::Faces).iter().copied().collect::<Vec<_>>(),
            vec![1, 3]
        );
    }
}
