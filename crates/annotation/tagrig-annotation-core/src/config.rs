//! Core configuration for tagrig-annotation-core.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::baking::{BakeOptions, DEFAULT_BAKE_PROPERTIES};
use crate::capture::{CaptureOptions, DEFAULT_PROPERTIES};
use crate::error::AnnotationError;
use crate::optimize::DEFAULT_TOLERANCE;

/// Defaults applied by hosts when the user has not chosen otherwise.
/// Every field is optional in the JSON form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub optimize_tolerance: f32,
    pub bake_frame_step: u32,
    /// Substring-matched against curve data paths.
    pub capture_properties: Vec<String>,
    /// Matched exactly against curve data paths.
    pub bake_properties: Vec<String>,
    pub export: ExportOptions,
}

/// What goes into an export payload built from a document.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportOptions {
    pub include_mesh: bool,
    pub include_animation: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_mesh: true,
            include_animation: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            optimize_tolerance: DEFAULT_TOLERANCE,
            bake_frame_step: 1,
            capture_properties: DEFAULT_PROPERTIES.iter().map(|p| p.to_string()).collect(),
            bake_properties: DEFAULT_BAKE_PROPERTIES.iter().map(|p| p.to_string()).collect(),
            export: ExportOptions::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self, AnnotationError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnnotationError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), AnnotationError> {
        if !self.optimize_tolerance.is_finite() || self.optimize_tolerance < 0.0 {
            return Err(AnnotationError::InvalidArgument {
                reason: "optimize_tolerance must be a non-negative number".into(),
            });
        }
        if self.bake_frame_step == 0 {
            return Err(AnnotationError::InvalidArgument {
                reason: "bake_frame_step must be >= 1".into(),
            });
        }
        Ok(())
    }

    /// Capture options over the scene range with the configured properties.
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            properties: self.capture_properties.clone(),
            ..CaptureOptions::default()
        }
    }

    pub fn bake_options(&self) -> BakeOptions {
        BakeOptions {
            frame_step: self.bake_frame_step,
            properties: self.bake_properties.clone(),
        }
    }
}
