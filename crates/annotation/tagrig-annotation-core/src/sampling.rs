//! Track lookup utilities for captured keyframes.
//!
//! Model:
//! - Each track holds keyframes ordered by frame; frames may repeat.
//! - A frame is sampled from the tightest bracketing pair
//!   (last `prev.frame <= frame`, first `next.frame >= frame`) with a linear blend.
//! - Frames outside the captured range have no value.

use crate::data::{AnimationTrack, Keyframe};
use crate::interp::functions::linear_value;
use crate::value::{Interpolation, Value};

/// Find the bracketing pair (prev, next) around `frame`.
/// Returns None when the frame lies before the first or after the last keyframe.
/// The scan stops at the first keyframe at or after `frame`, so a repeated frame
/// resolves to its first occurrence on both sides.
pub fn find_bracket(keyframes: &[Keyframe], frame: f32) -> Option<(&Keyframe, &Keyframe)> {
    let mut prev: Option<&Keyframe> = None;
    for kf in keyframes {
        let f = kf.frame as f32;
        if f <= frame {
            prev = Some(kf);
        }
        if f >= frame {
            return prev.map(|p| (p, kf));
        }
    }
    None
}

/// Sample a single track at `frame`. Linear blend between the bracket; the
/// interpolation tag of the left keyframe is reported alongside.
pub fn sample_track(track: &AnimationTrack, frame: f32) -> Option<(Value, Interpolation)> {
    let (prev, next) = find_bracket(&track.keyframes, frame)?;
    if prev.frame == next.frame {
        return Some((prev.value.clone(), prev.interpolation));
    }
    let t = (frame - prev.frame as f32) / (next.frame - prev.frame) as f32;
    Some((linear_value(&prev.value, &next.value, t), prev.interpolation))
}

/// Value of the first track animating `property_path` at `frame`.
pub fn value_at_frame(
    tracks: &[AnimationTrack],
    property_path: &str,
    frame: f32,
) -> Option<(Value, Interpolation)> {
    let track = tracks.iter().find(|t| t.property_path == property_path)?;
    sample_track(track, frame)
}
