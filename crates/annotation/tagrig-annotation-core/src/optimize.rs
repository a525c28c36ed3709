//! Keyframe simplification: drop interior keyframes a straight line already predicts.

use crate::data::{AnimationTrack, Keyframe};

/// Default tolerance used when callers have no preference.
pub const DEFAULT_TOLERANCE: f32 = 0.001;

/// Greedy single pass over one track.
///
/// For every interior keyframe `i` the value predicted by the line through `i-1` and
/// `i+1` is compared to the actual value; a difference below `tolerance` removes `i`
/// and the same index is examined again (its neighbors changed). Keyframes whose
/// neighbors share a frame are kept. Not globally optimal.
pub fn simplify_pass(keyframes: &mut Vec<Keyframe>, tolerance: f32) -> usize {
    let mut removed = 0;
    let mut i = 1;
    while i + 1 < keyframes.len() {
        let prev = &keyframes[i - 1];
        let curr = &keyframes[i];
        let next = &keyframes[i + 1];

        let span = (next.frame - prev.frame) as f32;
        if span == 0.0 {
            i += 1;
            continue;
        }
        let t = (curr.frame - prev.frame) as f32 / span;
        let (pv, nv) = (prev.value.primary(), next.value.primary());
        let expected = pv + t * (nv - pv);

        if (curr.value.primary() - expected).abs() < tolerance {
            keyframes.remove(i);
            removed += 1;
        } else {
            i += 1;
        }
    }
    removed
}

/// Repeat [`simplify_pass`] until a pass removes nothing.
///
/// A kept keyframe can become redundant once its right neighbor is removed later in
/// the same pass, so a single pass is not a fixed point. Running to convergence makes
/// a second call a no-op.
pub fn simplify_keyframes(keyframes: &mut Vec<Keyframe>, tolerance: f32) -> usize {
    let mut total = 0;
    loop {
        let removed = simplify_pass(keyframes, tolerance);
        if removed == 0 {
            return total;
        }
        total += removed;
    }
}

/// Simplify every track; returns the total number of removed keyframes.
pub fn optimize_tracks(tracks: &mut [AnimationTrack], tolerance: f32) -> usize {
    tracks
        .iter_mut()
        .map(|track| simplify_keyframes(&mut track.keyframes, tolerance))
        .sum()
}
