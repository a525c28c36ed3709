//! Interpolation helpers:
//! - lerp_f32 / linear_value (component-wise blend)
//! - interpolate_keyframes (frame + value blend between two keyframes)
//! - keyframe_handles (explicit or default flat handles)
//! - bezier_segment_value (cubic Bezier through key handles, solved in frame space)

use crate::data::Keyframe;
use crate::value::Value;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation across Value kinds.
/// Vectors blend component-wise over the shorter length; mismatched kinds hold the left value.
pub fn linear_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Scalar(va), Value::Scalar(vb)) => Value::Scalar(lerp_f32(*va, *vb, t)),
        (Value::Vector(va), Value::Vector(vb)) => Value::Vector(
            va.iter()
                .zip(vb.iter())
                .map(|(x, y)| lerp_f32(*x, *y, t))
                .collect(),
        ),
        // Fallback: if kinds mismatch, prefer left (fail-soft).
        _ => a.clone(),
    }
}

/// Blend two keyframes by `factor`. Frame and value are linear in `factor`; the frame is
/// rounded to the nearest integer and the interpolation tag comes from `kf1`.
/// Factors outside [0,1] extrapolate.
pub fn interpolate_keyframes(kf1: &Keyframe, kf2: &Keyframe, factor: f32) -> Keyframe {
    let span = f64::from(kf2.frame) - f64::from(kf1.frame);
    let frame = (f64::from(kf1.frame) + f64::from(factor) * span).round();
    Keyframe {
        frame: frame.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32,
        value: linear_value(&kf1.value, &kf2.value, factor),
        interpolation: kf1.interpolation,
        handle_left: None,
        handle_right: None,
    }
}

/// Handle positions of a keyframe as (frame, value) points.
/// Keyframes without explicit handles get flat handles one frame to each side.
pub fn keyframe_handles(kf: &Keyframe) -> ([f32; 2], [f32; 2]) {
    match (kf.handle_left, kf.handle_right) {
        (Some(left), Some(right)) => (left, right),
        _ => {
            let frame = kf.frame as f32;
            let value = kf.value.primary();
            ([frame - 1.0, value], [frame + 1.0, value])
        }
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Evaluate the Bezier segment between key points `p0` and `p3` with handles `p1`
/// (leaving p0) and `p2` (arriving at p3) at `frame`.
///
/// Handle frames are clamped into the segment so x(t) stays monotonic; the curve
/// parameter is then found by binary search on x.
pub fn bezier_segment_value(
    p0: [f32; 2],
    p1: [f32; 2],
    p2: [f32; 2],
    p3: [f32; 2],
    frame: f32,
) -> f32 {
    let (x0, x3) = (p0[0], p3[0]);
    if x3 <= x0 {
        return p0[1];
    }
    let x1 = p1[0].clamp(x0, x3);
    let x2 = p2[0].clamp(x0, x3);
    let target = frame.clamp(x0, x3);

    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = (target - x0) / (x3 - x0);
    for _ in 0..32 {
        let x = cubic_bezier(x0, x1, x2, x3, mid);
        if (x - target).abs() < 1e-5 {
            break;
        }
        if x < target {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(p0[1], p1[1], p2[1], p3[1], mid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Interpolation;

    #[test]
    fn interpolate_endpoints() {
        let a = Keyframe::new(0, 0.0, Interpolation::Bezier);
        let b = Keyframe::new(10, 5.0, Interpolation::Constant);
        let start = interpolate_keyframes(&a, &b, 0.0);
        assert_eq!((start.frame, start.value.clone()), (0, Value::Scalar(0.0)));
        let end = interpolate_keyframes(&a, &b, 1.0);
        assert_eq!((end.frame, end.value.clone()), (10, Value::Scalar(5.0)));
        assert_eq!(end.interpolation, Interpolation::Bezier);
    }

    #[test]
    fn interpolate_extrapolates_and_blends_vectors() {
        let a = Keyframe::new(10, vec![0.0, 1.0, 2.0], Interpolation::Linear);
        let b = Keyframe::new(20, vec![2.0, 3.0, 4.0], Interpolation::Linear);
        let mid = interpolate_keyframes(&a, &b, 0.5);
        assert_eq!(mid.frame, 15);
        assert_eq!(mid.value, Value::Vector(vec![1.0, 2.0, 3.0]));
        let past = interpolate_keyframes(&a, &b, 2.0);
        assert_eq!(past.frame, 30);
        assert_eq!(past.value, Value::Vector(vec![4.0, 5.0, 6.0]));
        let before = interpolate_keyframes(&a, &b, -0.5);
        assert_eq!(before.frame, 5);
    }

    #[test]
    fn default_handles_are_flat() {
        let kf = Keyframe::new(4, 2.0, Interpolation::Bezier);
        assert_eq!(keyframe_handles(&kf), ([3.0, 2.0], [5.0, 2.0]));
        let kf = kf.with_handles([3.5, 1.0], [4.5, 3.0]);
        assert_eq!(keyframe_handles(&kf), ([3.5, 1.0], [4.5, 3.0]));
    }

    #[test]
    fn bezier_segment_hits_endpoints_and_is_monotonic_for_flat_handles() {
        let p0 = [0.0, 0.0];
        let p3 = [10.0, 10.0];
        let p1 = [1.0, 0.0];
        let p2 = [9.0, 10.0];
        assert!((bezier_segment_value(p0, p1, p2, p3, 0.0) - 0.0).abs() < 1e-3);
        assert!((bezier_segment_value(p0, p1, p2, p3, 10.0) - 10.0).abs() < 1e-3);
        let mut last = -1.0;
        for f in 0..=10 {
            let v = bezier_segment_value(p0, p1, p2, p3, f as f32);
            assert!(v >= last - 1e-4, "not monotonic at {f}: {v} < {last}");
            last = v;
        }
        // Symmetric ease: midpoint maps to the mid value.
        assert!((bezier_segment_value(p0, p1, p2, p3, 5.0) - 5.0).abs() < 1e-2);
    }
}
