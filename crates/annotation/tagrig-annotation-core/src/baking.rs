//! Baking: resample source curves at a fixed frame step over a frame range.

use serde::{Deserialize, Serialize};

use crate::data::{AnimationTrack, Keyframe};
use crate::source::AnimationSource;
use crate::value::{Interpolation, Value};

/// Properties baked when the caller does not name any. Matched exactly.
pub const DEFAULT_BAKE_PROPERTIES: [&str; 3] = ["location", "rotation_euler", "scale"];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BakeOptions {
    /// Distance in frames between baked samples. Must be >= 1.
    pub frame_step: u32,
    pub properties: Vec<String>,
}

impl Default for BakeOptions {
    fn default() -> Self {
        Self {
            frame_step: 1,
            properties: DEFAULT_BAKE_PROPERTIES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl BakeOptions {
    pub fn step(mut self, frame_step: u32) -> Self {
        self.frame_step = frame_step;
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

/// Frames `start, start + step, ...` up to and including `end` when it lands on the grid.
pub fn bake_frames(start: i32, end: i32, step: u32) -> impl Iterator<Item = i32> {
    let step = i64::from(step.max(1));
    let (start, end) = (i64::from(start), i64::from(end));
    (0..)
        .map(move |i: i64| start + i * step)
        .take_while(move |f| *f <= end)
        .map(|f| f as i32)
}

/// Resample, property by property, every curve whose data path equals the property.
/// Tracks are named `<property>[<n>]` with `n` counting that property's curves. All
/// keys are LINEAR.
pub fn bake_tracks(
    source: &dyn AnimationSource,
    start: i32,
    end: i32,
    opts: &BakeOptions,
) -> Vec<AnimationTrack> {
    let curves = source.curves();
    let mut tracks = Vec::new();
    for prop in &opts.properties {
        let matching = curves.iter().filter(|curve| curve.data_path() == prop.as_str());
        for (n, curve) in matching.enumerate() {
            let mut track = AnimationTrack::new(format!("{prop}[{n}]"), prop.as_str());
            track.keyframes = bake_frames(start, end, opts.frame_step)
                .map(|frame| {
                    Keyframe::new(
                        frame,
                        Value::Scalar(curve.evaluate(frame as f32)),
                        Interpolation::Linear,
                    )
                })
                .collect();
            tracks.push(track);
        }
    }
    tracks
}
