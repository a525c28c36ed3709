//! Motion metrics over captured tracks.
//!
//! Velocity between consecutive keyframes of a property is `|Δvalue| / Δframe`; pairs
//! with a non-positive frame delta are skipped.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::data::AnimationTrack;

/// Aggregate velocity statistics (values per frame).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MotionMetrics {
    pub average_velocity: f32,
    pub peak_velocity: f32,
    pub min_velocity: f32,
    /// Velocity samples per frame of the overall captured range; 0 for a zero-length range.
    pub motion_complexity: f32,
    pub velocity_samples: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MotionAnalysis {
    pub track_count: usize,
    pub keyframe_count: usize,
    /// (min, max) frame across all tracks, None when no track has keyframes.
    pub frame_range: Option<(i32, i32)>,
    pub properties: BTreeSet<String>,
    /// None when there are no velocity samples (no tracks, or single-key channels).
    pub metrics: Option<MotionMetrics>,
}

/// Analyse a set of tracks. The previous (frame, value) is kept per property path and
/// carried across tracks, so the last key of `location[0]` pairs with the first key of
/// `location[1]`.
pub fn analyze_motion(tracks: &[AnimationTrack]) -> MotionAnalysis {
    let mut analysis = MotionAnalysis {
        track_count: tracks.len(),
        ..MotionAnalysis::default()
    };
    if tracks.is_empty() {
        return analysis;
    }

    let mut velocities: Vec<f32> = Vec::new();
    let mut prev_by_property: HashMap<&str, (i32, f32)> = HashMap::new();
    for track in tracks {
        analysis.properties.insert(track.property_path.clone());
        analysis.keyframe_count += track.keyframes.len();

        if let Some((lo, hi)) = track.frame_range() {
            analysis.frame_range = Some(match analysis.frame_range {
                Some((a, b)) => (a.min(lo), b.max(hi)),
                None => (lo, hi),
            });
        }

        for kf in &track.keyframes {
            let value = kf.value.primary();
            let prev = prev_by_property.insert(track.property_path.as_str(), (kf.frame, value));
            if let Some((prev_frame, prev_value)) = prev {
                let dt = kf.frame - prev_frame;
                if dt > 0 {
                    velocities.push((value - prev_value).abs() / dt as f32);
                }
            }
        }
    }

    if velocities.is_empty() {
        return analysis;
    }

    let sum: f32 = velocities.iter().sum();
    let peak = velocities.iter().copied().fold(f32::MIN, f32::max);
    let min = velocities.iter().copied().fold(f32::MAX, f32::min);
    let span = analysis
        .frame_range
        .map(|(lo, hi)| (hi - lo) as f32)
        .unwrap_or(0.0);
    let complexity = if span > 0.0 {
        velocities.len() as f32 / span
    } else {
        0.0
    };

    analysis.metrics = Some(MotionMetrics {
        average_velocity: sum / velocities.len() as f32,
        peak_velocity: peak,
        min_velocity: min,
        motion_complexity: complexity,
        velocity_samples: velocities.len(),
    });
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Keyframe;
    use crate::value::Interpolation;

    fn track(name: &str, property: &str, points: &[(i32, f32)]) -> AnimationTrack {
        let mut t = AnimationTrack::new(name, property);
        t.keyframes = points
            .iter()
            .map(|(f, v)| Keyframe::new(*f, *v, Interpolation::Linear))
            .collect();
        t
    }

    #[test]
    fn empty_tracks_have_no_metrics() {
        let a = analyze_motion(&[]);
        assert_eq!(a.track_count, 0);
        assert!(a.metrics.is_none());
        assert!(a.frame_range.is_none());
    }

    #[test]
    fn single_segment_velocity() {
        let a = analyze_motion(&[track("location[0]", "location", &[(0, 0.0), (10, 5.0)])]);
        let m = a.metrics.expect("metrics");
        assert_eq!(m.average_velocity, 0.5);
        assert_eq!(m.peak_velocity, 0.5);
        assert_eq!(m.min_velocity, 0.5);
        assert_eq!(m.velocity_samples, 1);
        assert!((m.motion_complexity - 0.1).abs() < 1e-6);
        assert_eq!(a.frame_range, Some((0, 10)));
    }

    #[test]
    fn same_property_pairs_across_tracks() {
        let tracks = [
            track("location[0]", "location", &[(0, 0.0), (4, 4.0)]),
            track("location[1]", "location", &[(8, 100.0), (12, 100.0)]),
        ];
        let a = analyze_motion(&tracks);
        let m = a.metrics.expect("metrics");
        // (4, 4) -> (8, 100) is paired as well.
        assert_eq!(m.velocity_samples, 3);
        assert_eq!(m.peak_velocity, 24.0);
        assert_eq!(m.min_velocity, 0.0);
        assert_eq!(a.properties.len(), 1);
        assert_eq!(a.keyframe_count, 4);
    }

    #[test]
    fn distinct_properties_stay_apart() {
        let tracks = [
            track("location[0]", "location", &[(0, 0.0), (4, 4.0)]),
            track("scale[0]", "scale", &[(8, 100.0), (12, 100.0)]),
        ];
        let m = analyze_motion(&tracks).metrics.expect("metrics");
        assert_eq!(m.velocity_samples, 2);
        assert_eq!(m.peak_velocity, 1.0);
    }

    #[test]
    fn backwards_pair_across_tracks_is_skipped() {
        let tracks = [
            track("rotation_euler[0]", "rotation_euler", &[(0, 0.0), (10, 5.0)]),
            track("rotation_euler[1]", "rotation_euler", &[(0, 3.0), (10, 3.0)]),
        ];
        let m = analyze_motion(&tracks).metrics.expect("metrics");
        assert_eq!(m.velocity_samples, 2);
        assert_eq!(m.average_velocity, 0.25);
    }

    #[test]
    fn zero_span_guards_division() {
        let a = analyze_motion(&[track("scale[0]", "scale", &[(3, 1.0), (3, 2.0)])]);
        assert!(a.metrics.is_none());
        assert_eq!(a.frame_range, Some((3, 3)));
    }
}
