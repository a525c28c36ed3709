//! Interpolation helpers shared by sampling, baking and curve evaluation.

pub mod functions;

pub use functions::{interpolate_keyframes, keyframe_handles, linear_value};
