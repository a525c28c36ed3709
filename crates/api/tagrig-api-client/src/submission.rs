//! Submission packages: export payload objects plus metadata about the exporting host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tagrig_annotation_core::export::PayloadObject;
use tagrig_annotation_core::{AnnotationDocument, ExportOptions};

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    Full,
    Partial,
}

impl SubmissionType {
    /// Full only when both mesh regions and animation are included.
    pub fn for_options(options: ExportOptions) -> Self {
        if options.include_mesh && options.include_animation {
            SubmissionType::Full
        } else {
            SubmissionType::Partial
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubmissionMetadata {
    pub host_version: String,
    pub plugin_version: String,
    pub scene_name: String,
    pub frame_range: (i32, i32),
    pub submission_type: SubmissionType,
}

/// Host facts that are not part of the annotation document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub host_version: String,
    pub plugin_version: String,
    pub frame_range: (i32, i32),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub metadata: SubmissionMetadata,
    pub objects: Vec<PayloadObject>,
}

impl Submission {
    /// Package every tagged object of the document.
    pub fn from_document(doc: &AnnotationDocument, options: ExportOptions, host: &HostInfo) -> Self {
        let payload = doc.export_payload(options);
        Submission {
            metadata: SubmissionMetadata {
                host_version: host.host_version.clone(),
                plugin_version: host.plugin_version.clone(),
                scene_name: doc.scene.clone(),
                frame_range: host.frame_range,
                submission_type: SubmissionType::for_options(options),
            },
            objects: payload.objects.unwrap_or_default(),
        }
    }

    pub fn to_validated_value(&self) -> Result<Value, ApiError> {
        let value = serde_json::to_value(self)?;
        validate_submission(&value)?;
        Ok(value)
    }
}

fn invalid(message: String) -> ApiError {
    ApiError::Validation(message)
}

/// Check a submission body before it is sent.
pub fn validate_submission(data: &Value) -> Result<(), ApiError> {
    let objects = match data.get("objects").and_then(Value::as_array) {
        Some(objects) if !objects.is_empty() => objects,
        _ => return Err(invalid("No annotated objects found".into())),
    };

    for (idx, obj) in objects.iter().enumerate() {
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid(format!("Object #{idx} has no name")))?;
        if obj.get("type").and_then(Value::as_str).is_none() {
            return Err(invalid(format!("Object {name} has no type")));
        }
        let tags = match obj.get("tags").and_then(Value::as_array) {
            Some(tags) if !tags.is_empty() => tags,
            _ => return Err(invalid(format!("Object {name} has no tags"))),
        };
        for tag in tags {
            if tag.get("name").and_then(Value::as_str).is_none() {
                return Err(invalid(format!("Object {name} has a tag without a name")));
            }
            if let Some(color) = tag.get("color") {
                let len = color.as_array().map(Vec::len);
                if !matches!(len, Some(3 | 4)) {
                    return Err(invalid(format!(
                        "Object {name} has a tag color that is not 3 or 4 numbers"
                    )));
                }
            }
        }
    }
    Ok(())
}
