//! Error types for annotation and export operations.

use crate::ids::ObjectId;

/// Failure of a store operation. The store is left unmodified whenever one of these is
/// returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnnotationError {
    /// No object with this id is registered in the document
    #[error("Object not found: {id}")]
    ObjectNotFound { id: ObjectId },

    /// The object exists but has never been annotated
    #[error("Object '{name}' has no annotation data")]
    NotAnnotated { name: String },

    /// Region operations require a mesh object
    #[error("Object '{name}' is not a mesh (kind {kind})")]
    NotMesh { name: String, kind: String },

    /// Capture/bake were invoked without an animation source
    #[error("Object '{name}' has no animation data")]
    NoAnimationSource { name: String },

    /// Bake needs at least one captured keyframe to derive its frame range
    #[error("Object '{name}' has no captured frame range")]
    EmptyFrameRange { name: String },

    /// Invalid argument (negative tolerance, zero frame step, inverted range, ...)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Document (de)serialization failure
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// IO error while loading/saving a document
    #[error("IO error: {reason}")]
    Io { reason: String },
}

impl AnnotationError {
    /// Error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ObjectNotFound { .. }
            | Self::NotAnnotated { .. }
            | Self::NotMesh { .. }
            | Self::NoAnimationSource { .. }
            | Self::EmptyFrameRange { .. } => "target",
            Self::InvalidArgument { .. } => "validation",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
        }
    }
}

impl From<std::io::Error> for AnnotationError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnnotationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

/// Failure of an export run. Nothing is written at the destination when returned.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ExportError {
    /// Payload failed validation before formatting
    #[error("Invalid export payload: {0}")]
    Validation(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::UnknownFormat(_) => "validation",
            Self::Encode(_) => "serialization",
            Self::Io(_) => "io",
        }
    }
}
