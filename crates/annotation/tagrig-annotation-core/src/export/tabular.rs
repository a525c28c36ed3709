//! Tabular (CSV) export. One fixed header; tag, region and keyframe rows share its columns.

use super::payload::{ExportPayload, PayloadObject};
use crate::data::ComponentKind;
use crate::error::ExportError;

pub const HEADER: [&str; 14] = [
    "object_name",
    "object_type",
    "tag_name",
    "tag_color",
    "location_x",
    "location_y",
    "location_z",
    "annotation_type",
    "component_indices",
    "track_name",
    "property_path",
    "keyframe_frame",
    "keyframe_value",
    "keyframe_interpolation",
];

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Floats keep a fractional part even when whole ("1.0", not "1").
fn float_cell(v: f32) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

fn join_floats(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| float_cell(*v))
        .collect::<Vec<_>>()
        .join(",")
}

fn join_indices(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn base_row(obj: &PayloadObject) -> Vec<String> {
    let mut row = vec![String::new(); HEADER.len()];
    row[0] = obj.name.clone();
    row[1] = obj.kind.clone();
    row[4] = float_cell(obj.location[0]);
    row[5] = float_cell(obj.location[1]);
    row[6] = float_cell(obj.location[2]);
    row
}

/// Header followed by every data row.
pub fn format_tabular(payload: &ExportPayload) -> Result<Vec<Vec<String>>, ExportError> {
    payload.validate()?;
    let mut rows = vec![HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>()];

    for obj in payload.objects() {
        for tag in &obj.tags {
            let mut row = base_row(obj);
            row[2] = tag.name.clone();
            row[3] = join_floats(&tag.color);
            rows.push(row);
        }

        for region in obj.mesh_annotations.iter().flatten() {
            for kind in ComponentKind::ALL {
                let indices = region.indices(kind);
                if indices.is_empty() {
                    continue;
                }
                let mut row = base_row(obj);
                row[7] = kind.as_str().to_string();
                row[8] = join_indices(indices);
                rows.push(row);
            }
        }

        for track in obj.animation_tracks.iter().flatten() {
            for kf in &track.keyframes {
                let mut row = base_row(obj);
                row[9] = track.name.clone();
                row[10] = track.property.clone();
                row[11] = kf.frame.to_string();
                row[12] = join_floats(&kf.value);
                row[13] = kf.interpolation.clone();
                rows.push(row);
            }
        }
    }
    Ok(rows)
}

fn write_field(out: &mut String, field: &str) {
    let needs_quote = field.contains(DELIMITER)
        || field.contains(QUOTE)
        || field.contains('\n')
        || field.contains('\r');
    if needs_quote {
        out.push(QUOTE);
        out.push_str(&field.replace(QUOTE, "\"\""));
        out.push(QUOTE);
    } else {
        out.push_str(field);
    }
}

/// Rows joined as CSV text, `\r\n` after every row.
pub fn write_rows(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        for (col, field) in row.iter().enumerate() {
            if col > 0 {
                out.push(DELIMITER);
            }
            write_field(&mut out, field);
        }
        out.push_str("\r\n");
    }
    out
}

pub fn render_tabular(payload: &ExportPayload) -> Result<String, ExportError> {
    Ok(write_rows(&format_tabular(payload)?))
}
