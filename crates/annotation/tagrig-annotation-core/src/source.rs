//! Host animation collaborator: curves the core captures from and bakes against.
//!
//! Hosts implement [`AnimationSource`] over their own animation data. [`Action`] and
//! [`FCurve`] are a plain-data implementation for hosts that copy curves out, and for tests.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::interp::functions::{bezier_segment_value, lerp_f32};
use crate::value::Interpolation;

/// A key on a source curve. Frames are fractional on the host side.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SourceKeyframe {
    pub frame: f32,
    pub value: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_left: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_right: Option<[f32; 2]>,
}

impl SourceKeyframe {
    pub fn new(frame: f32, value: f32, interpolation: Interpolation) -> Self {
        Self {
            frame,
            value,
            interpolation,
            handle_left: None,
            handle_right: None,
        }
    }
}

/// One animated channel on the host: a property path plus a component index.
pub trait AnimationCurve {
    fn data_path(&self) -> &str;
    fn array_index(&self) -> usize;
    fn keyframes(&self) -> &[SourceKeyframe];
    /// The host's own evaluation of the curve at `frame`.
    fn evaluate(&self, frame: f32) -> f32;
}

/// Animation attached to a host object.
pub trait AnimationSource {
    fn curves(&self) -> Vec<&dyn AnimationCurve>;
    /// Scene frame range used when a capture does not name its bounds.
    fn scene_frame_range(&self) -> (i32, i32);
}

/// Plain-data curve with a built-in evaluator: constant extrapolation outside the keys,
/// CONSTANT segments hold the left key, BEZIER segments follow the key handles, every
/// other tag evaluates linearly.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FCurve {
    pub data_path: String,
    #[serde(default)]
    pub array_index: usize,
    #[serde(default)]
    pub keyframes: Vec<SourceKeyframe>,
}

impl FCurve {
    pub fn new(data_path: impl Into<String>, array_index: usize) -> Self {
        Self {
            data_path: data_path.into(),
            array_index,
            keyframes: Vec::new(),
        }
    }

    pub fn with_key(mut self, frame: f32, value: f32, interpolation: Interpolation) -> Self {
        self.keyframes
            .push(SourceKeyframe::new(frame, value, interpolation));
        self
    }

    fn evaluate_segment(left: &SourceKeyframe, right: &SourceKeyframe, frame: f32) -> f32 {
        let span = right.frame - left.frame;
        if span <= 0.0 {
            return left.value;
        }
        match left.interpolation {
            Interpolation::Constant => left.value,
            Interpolation::Bezier => {
                let p0 = [left.frame, left.value];
                let p3 = [right.frame, right.value];
                let p1 = left.handle_right.unwrap_or([left.frame + 1.0, left.value]);
                let p2 = right.handle_left.unwrap_or([right.frame - 1.0, right.value]);
                bezier_segment_value(p0, p1, p2, p3, frame)
            }
            _ => lerp_f32(left.value, right.value, (frame - left.frame) / span),
        }
    }
}

impl AnimationCurve for FCurve {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn array_index(&self) -> usize {
        self.array_index
    }

    fn keyframes(&self) -> &[SourceKeyframe] {
        &self.keyframes
    }

    fn evaluate(&self, frame: f32) -> f32 {
        let keys = &self.keyframes;
        let (first, last) = match (keys.first(), keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if frame <= first.frame {
            return first.value;
        }
        if frame >= last.frame {
            return last.value;
        }
        keys.windows(2)
            .find(|w| frame >= w[0].frame && frame <= w[1].frame)
            .map(|w| Self::evaluate_segment(&w[0], &w[1], frame))
            .unwrap_or(last.value)
    }
}

/// A named set of curves with the scene range they were authored against.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Action {
    pub name: String,
    pub curves: Vec<FCurve>,
    pub frame_start: i32,
    pub frame_end: i32,
}

impl Action {
    pub fn new(name: impl Into<String>, frame_start: i32, frame_end: i32) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
            frame_start,
            frame_end,
        }
    }

    pub fn with_curve(mut self, curve: FCurve) -> Self {
        self.curves.push(curve);
        self
    }
}

impl AnimationSource for Action {
    fn curves(&self) -> Vec<&dyn AnimationCurve> {
        self.curves
            .iter()
            .map(|c| c as &dyn AnimationCurve)
            .collect()
    }

    fn scene_frame_range(&self) -> (i32, i32) {
        (self.frame_start, self.frame_end)
    }
}

/// Summary of a source's keyed range and channels.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimationStatistics {
    /// (min, max) key frame over all curves.
    pub frame_range: Option<(f32, f32)>,
    /// Whole frames covered by `frame_range`, inclusive.
    pub frame_count: u32,
    pub curve_count: usize,
    pub properties: BTreeSet<String>,
}

pub fn animation_statistics(source: &dyn AnimationSource) -> AnimationStatistics {
    let curves = source.curves();
    let mut stats = AnimationStatistics {
        curve_count: curves.len(),
        ..AnimationStatistics::default()
    };
    for curve in &curves {
        stats.properties.insert(curve.data_path().to_string());
        for key in curve.keyframes() {
            stats.frame_range = Some(match stats.frame_range {
                Some((lo, hi)) => (lo.min(key.frame), hi.max(key.frame)),
                None => (key.frame, key.frame),
            });
        }
    }
    if let Some((lo, hi)) = stats.frame_range {
        stats.frame_count = (hi - lo).max(0.0) as u32 + 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_and_constant_segments() {
        let curve = FCurve::new("location", 0)
            .with_key(0.0, 0.0, Interpolation::Linear)
            .with_key(10.0, 10.0, Interpolation::Constant)
            .with_key(20.0, 0.0, Interpolation::Linear);
        assert_eq!(curve.evaluate(-5.0), 0.0);
        assert_eq!(curve.evaluate(5.0), 5.0);
        assert_eq!(curve.evaluate(15.0), 10.0);
        assert_eq!(curve.evaluate(20.0), 0.0);
        assert_eq!(curve.evaluate(99.0), 0.0);
        assert_eq!(FCurve::new("scale", 0).evaluate(1.0), 0.0);
    }

    #[test]
    fn bezier_segment_passes_through_keys() {
        let curve = FCurve::new("location", 1)
            .with_key(0.0, 0.0, Interpolation::Bezier)
            .with_key(10.0, 4.0, Interpolation::Bezier);
        assert!((curve.evaluate(0.0) - 0.0).abs() < 1e-4);
        assert!((curve.evaluate(10.0) - 4.0).abs() < 1e-4);
        let mid = curve.evaluate(5.0);
        assert!(mid > 0.0 && mid < 4.0);
    }

    #[test]
    fn statistics() {
        let action = Action::new("Walk", 1, 250)
            .with_curve(
                FCurve::new("location", 0)
                    .with_key(1.0, 0.0, Interpolation::Linear)
                    .with_key(24.0, 1.0, Interpolation::Linear),
            )
            .with_curve(FCurve::new("rotation_euler", 2).with_key(12.0, 0.5, Interpolation::Bezier));
        let stats = animation_statistics(&action);
        assert_eq!(stats.curve_count, 2);
        assert_eq!(stats.frame_range, Some((1.0, 24.0)));
        assert_eq!(stats.frame_count, 24);
        assert!(stats.properties.contains("rotation_euler"));
        assert_eq!(action.scene_frame_range(), (1, 250));
    }
}
