//! Tagrig Annotation Core (host-agnostic)
//!
//! Data core of a 3D annotation tool: per-object tags and mesh-region annotations,
//! keyframe tracks captured or baked from host animation curves, keyframe algorithms
//! (interpolation, sampling, simplification, motion metrics) and JSON/CSV export.
//!
//! Host objects are registered in an [`AnnotationDocument`] and addressed by
//! [`ObjectId`]; store and track operations live on [`ObjectRecord`].

pub mod baking;
pub mod capture;
pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod export;
pub mod ids;
pub mod interp;
pub mod metrics;
pub mod optimize;
pub mod sampling;
pub mod source;
pub mod store;
pub mod tracks;
pub mod value;

// Re-exports for host adapters
pub use baking::{BakeOptions, DEFAULT_BAKE_PROPERTIES};
pub use capture::{CaptureOptions, DEFAULT_PROPERTIES};
pub use config::{Config, ExportOptions};
pub use data::{
    AnimationTrack, Color, ComponentKind, Keyframe, MeshTopology, ObjectAnnotation, ObjectKind,
    RegionAnnotation, Tag, Transform,
};
pub use document::{AnnotationDocument, ObjectRecord, DOCUMENT_VERSION};
pub use error::{AnnotationError, ExportError};
pub use export::{export_to_path, ExportContext, ExportFormat, ExportPayload};
pub use ids::ObjectId;
pub use interp::{interpolate_keyframes, keyframe_handles};
pub use metrics::{analyze_motion, MotionAnalysis, MotionMetrics};
pub use optimize::{optimize_tracks, simplify_keyframes, DEFAULT_TOLERANCE};
pub use sampling::{sample_track, value_at_frame};
pub use source::{
    animation_statistics, Action, AnimationCurve, AnimationSource, AnimationStatistics, FCurve,
    SourceKeyframe,
};
pub use store::{AnnotationStats, ComponentCounts, ComponentSelection, RegionIssue, SelectMode};
pub use value::{Interpolation, Value, ValueKind};
