//! Capture: copy source curve keys inside a frame window into tracks.

use serde::{Deserialize, Serialize};

use crate::data::{AnimationTrack, Keyframe};
use crate::source::AnimationSource;
use crate::value::Value;

/// Properties captured when the caller does not name any.
pub const DEFAULT_PROPERTIES: [&str; 3] = ["location", "rotation", "scale"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CaptureOptions {
    /// Inclusive bounds; None falls back to the source's scene range.
    pub start_frame: Option<i32>,
    pub end_frame: Option<i32>,
    pub properties: Vec<String>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            start_frame: None,
            end_frame: None,
            properties: DEFAULT_PROPERTIES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl CaptureOptions {
    pub fn range(mut self, start: i32, end: i32) -> Self {
        self.start_frame = Some(start);
        self.end_frame = Some(end);
        self
    }

    pub fn properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }
}

/// Substring match, so "rotation" selects "rotation_euler" and "rotation_quaternion".
pub fn matches_property(data_path: &str, properties: &[String]) -> bool {
    properties.iter().any(|p| data_path.contains(p.as_str()))
}

/// Canonical track name for one curve channel.
pub fn track_name(data_path: &str, array_index: usize) -> String {
    format!("{data_path}[{array_index}]")
}

/// One track per matching curve holding every key with `start <= frame <= end`.
/// Interpolation and handles are carried over; fractional frames truncate toward zero.
pub fn capture_tracks(
    source: &dyn AnimationSource,
    start: i32,
    end: i32,
    properties: &[String],
) -> Vec<AnimationTrack> {
    let (lo, hi) = (start as f32, end as f32);
    source
        .curves()
        .into_iter()
        .filter(|curve| matches_property(curve.data_path(), properties))
        .map(|curve| {
            let mut track = AnimationTrack::new(
                track_name(curve.data_path(), curve.array_index()),
                curve.data_path(),
            );
            track.keyframes = curve
                .keyframes()
                .iter()
                .filter(|key| key.frame >= lo && key.frame <= hi)
                .map(|key| Keyframe {
                    frame: key.frame as i32,
                    value: Value::Scalar(key.value),
                    interpolation: key.interpolation,
                    handle_left: key.handle_left,
                    handle_right: key.handle_right,
                })
                .collect();
            track
        })
        .collect()
}
