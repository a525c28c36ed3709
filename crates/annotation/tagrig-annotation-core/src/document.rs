//! Annotation document: the explicit owner of every object's annotation data.
//!
//! Objects are registered by the host and addressed by [`ObjectId`]. Each record carries
//! an optional [`ObjectAnnotation`], created on first annotation and dropped with the
//! record. The document round-trips through JSON.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::data::{MeshTopology, ObjectAnnotation, ObjectKind, Transform};
use crate::error::AnnotationError;
use crate::export::write_atomically;
use crate::ids::{IdAllocator, ObjectId};

/// Schema tag written into saved documents.
pub const DOCUMENT_VERSION: &str = "1";

/// One host object as seen by the core.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub transform: Transform,
    /// Current component counts reported by the host (mesh objects only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<MeshTopology>,
    /// Present once the object has been annotated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<ObjectAnnotation>,
}

impl ObjectRecord {
    pub fn new(id: ObjectId, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            transform: Transform::default(),
            topology: None,
            annotation: None,
        }
    }

    #[inline]
    pub fn has_annotation(&self) -> bool {
        self.annotation.is_some()
    }

    #[inline]
    pub fn annotation(&self) -> Option<&ObjectAnnotation> {
        self.annotation.as_ref()
    }

    /// Annotation data, created empty on first use.
    pub fn ensure_annotation(&mut self) -> &mut ObjectAnnotation {
        if self.annotation.is_none() {
            debug!("creating annotation data for '{}'", self.name);
        }
        self.annotation.get_or_insert_with(ObjectAnnotation::default)
    }

    pub(crate) fn require_mesh(&self) -> Result<(), AnnotationError> {
        if self.kind.is_mesh() {
            Ok(())
        } else {
            Err(AnnotationError::NotMesh {
                name: self.name.clone(),
                kind: self.kind.to_string(),
            })
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    version: String,
    #[serde(default)]
    scene: String,
    #[serde(default)]
    objects: Vec<ObjectRecord>,
}

/// Owner of all object records, keyed by stable id in registration order.
#[derive(Debug, Default, Clone)]
pub struct AnnotationDocument {
    pub scene: String,
    objects: IndexMap<ObjectId, ObjectRecord>,
    ids: IdAllocator,
}

impl AnnotationDocument {
    pub fn new(scene: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            ..Self::default()
        }
    }

    /// Register a host object and return its id.
    pub fn register_object(&mut self, name: impl Into<String>, kind: ObjectKind) -> ObjectId {
        let id = self.ids.alloc_object();
        let record = ObjectRecord::new(id, name, kind);
        debug!("registered {} '{}' as {}", record.kind, record.name, id);
        self.objects.insert(id, record);
        id
    }

    /// Register a mesh object together with its current component counts.
    pub fn register_mesh(&mut self, name: impl Into<String>, topology: MeshTopology) -> ObjectId {
        let id = self.register_object(name, ObjectKind::Mesh);
        if let Some(record) = self.objects.get_mut(&id) {
            record.topology = Some(topology);
        }
        id
    }

    /// Drop an object and everything annotated on it.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<ObjectRecord> {
        self.objects.shift_remove(&id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.objects.get(&id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut ObjectRecord, AnnotationError> {
        self.objects
            .get_mut(&id)
            .ok_or(AnnotationError::ObjectNotFound { id })
    }

    /// First object registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .values()
            .find(|record| record.name == name)
            .map(|record| record.id)
    }

    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) -> Result<(), AnnotationError> {
        self.object_mut(id)?.transform = transform;
        Ok(())
    }

    pub fn set_topology(&mut self, id: ObjectId, topology: MeshTopology) -> Result<(), AnnotationError> {
        let record = self.object_mut(id)?;
        record.require_mesh()?;
        record.topology = Some(topology);
        Ok(())
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.objects.values()
    }

    /// Objects that carry annotation data.
    pub fn annotated_objects(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.objects.values().filter(|record| record.has_annotation())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn to_json(&self) -> Result<String, AnnotationError> {
        let file = DocumentFile {
            version: DOCUMENT_VERSION.to_string(),
            scene: self.scene.clone(),
            objects: self.objects.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn from_json(s: &str) -> Result<Self, AnnotationError> {
        let file: DocumentFile = serde_json::from_str(s)?;
        if file.version != DOCUMENT_VERSION {
            return Err(AnnotationError::Serialization {
                reason: format!("unsupported document version '{}'", file.version),
            });
        }
        let mut doc = AnnotationDocument::new(file.scene);
        for record in file.objects {
            if doc.objects.contains_key(&record.id) {
                return Err(AnnotationError::Serialization {
                    reason: format!("duplicate object id {}", record.id),
                });
            }
            doc.ids.observe(record.id);
            doc.objects.insert(record.id, record);
        }
        Ok(doc)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnnotationError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let doc = Self::from_json(&text)?;
        info!("loaded {} objects from {}", doc.len(), path.display());
        Ok(doc)
    }

    /// Save next to the destination first, then rename over it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AnnotationError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        write_atomically(path, &json)?;
        info!("saved {} objects to {}", self.len(), path.display());
        Ok(())
    }
}
