//! Export of annotation data to the structured (JSON) and tabular (CSV) formats.
//!
//! Rendering happens fully in memory; [`export_to_path`] then writes a sibling temp file
//! and renames it over the destination, so a failed export never leaves a partial file.

pub mod payload;
pub mod structured;
pub mod tabular;

use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub use payload::{
    ExportPayload, PayloadKeyframe, PayloadObject, PayloadRegion, PayloadTag, PayloadTrack,
};
pub use structured::{format_structured, render_structured, StructuredDocument, FORMAT_VERSION};
pub use tabular::{format_tabular, render_tabular, HEADER};

use crate::error::ExportError;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Default file name for a scene, e.g. `shot010_annotations.json`.
    pub fn default_file_name(&self, stem: &str) -> String {
        format!("{stem}_annotations.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JSON" => Ok(ExportFormat::Json),
            "CSV" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Facts about the exporting host that end up in the structured header.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportContext {
    pub host_version: String,
    /// None stamps the export with the current UTC time.
    pub timestamp: Option<String>,
}

impl ExportContext {
    pub fn new(host_version: impl Into<String>) -> Self {
        Self {
            host_version: host_version.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn resolved_timestamp(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339())
    }
}

/// Render a payload in `format` without touching the filesystem.
pub fn render(
    payload: &ExportPayload,
    format: ExportFormat,
    ctx: &ExportContext,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => render_structured(payload, ctx),
        ExportFormat::Csv => render_tabular(payload),
    }
}

/// Write to a sibling temp file, then rename over `path`. Shared with document saves.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Validate, render and write. On error the destination is left as it was.
pub fn export_to_path(
    payload: &ExportPayload,
    format: ExportFormat,
    ctx: &ExportContext,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let result = render(payload, format, ctx).and_then(|text| write_atomically(path, &text).map_err(ExportError::from));
    match &result {
        Ok(()) => info!(
            "exported {} objects as {} to {}",
            payload.objects().len(),
            format,
            path.display()
        ),
        Err(err) => warn!("{format} export to {} failed: {err}", path.display()),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(" Csv ".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
        assert_eq!(ExportFormat::Csv.default_file_name("shot"), "shot_annotations.csv");
    }

    #[test]
    fn timestamp_defaults_to_now() {
        let ts = ExportContext::new("4.2").resolved_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
