//! Keyframe track operations on an object record: capture, bake, optimize and analysis.

use log::{debug, info};

use crate::baking::{bake_tracks, BakeOptions};
use crate::capture::{capture_tracks, matches_property, CaptureOptions};
use crate::data::AnimationTrack;
use crate::document::ObjectRecord;
use crate::error::AnnotationError;
use crate::metrics::{analyze_motion, MotionAnalysis};
use crate::optimize::optimize_tracks;
use crate::sampling;
use crate::source::AnimationSource;
use crate::value::{Interpolation, Value};

impl ObjectRecord {
    fn require_source<'a>(
        &self,
        source: Option<&'a dyn AnimationSource>,
    ) -> Result<&'a dyn AnimationSource, AnnotationError> {
        source.ok_or_else(|| AnnotationError::NoAnimationSource {
            name: self.name.clone(),
        })
    }

    pub fn animation_tracks(&self) -> &[AnimationTrack] {
        self.annotation()
            .map(|a| a.animation_tracks.as_slice())
            .unwrap_or(&[])
    }

    /// Replace the tracks of every requested property with the source keys inside the
    /// frame window. Returns the number of tracks created.
    pub fn capture(
        &mut self,
        source: Option<&dyn AnimationSource>,
        opts: &CaptureOptions,
    ) -> Result<usize, AnnotationError> {
        let source = self.require_source(source)?;
        let (scene_start, scene_end) = source.scene_frame_range();
        let start = opts.start_frame.unwrap_or(scene_start);
        let end = opts.end_frame.unwrap_or(scene_end);
        if start > end {
            return Err(AnnotationError::InvalidArgument {
                reason: format!("capture range {start}..={end} is inverted"),
            });
        }

        let captured = capture_tracks(source, start, end, &opts.properties);
        let name = self.name.clone();
        let tracks = &mut self.ensure_annotation().animation_tracks;
        let before = tracks.len();
        tracks.retain(|t| !matches_property(&t.property_path, &opts.properties));
        debug!("'{}': replaced {} tracks", name, before - tracks.len());

        let count = captured.len();
        let keys: usize = captured.iter().map(|t| t.keyframes.len()).sum();
        tracks.extend(captured);
        info!("'{name}': captured {count} tracks ({keys} keyframes) in {start}..={end}");
        Ok(count)
    }

    /// Resample the source over the frame range spanned by the current tracks.
    /// Every existing track is dropped. Returns the number of baked tracks.
    pub fn bake(
        &mut self,
        source: Option<&dyn AnimationSource>,
        opts: &BakeOptions,
    ) -> Result<usize, AnnotationError> {
        if opts.frame_step == 0 {
            return Err(AnnotationError::InvalidArgument {
                reason: "frame_step must be >= 1".into(),
            });
        }
        let source = self.require_source(source)?;
        let (start, end) = self
            .frame_range()
            .ok_or_else(|| AnnotationError::EmptyFrameRange {
                name: self.name.clone(),
            })?;

        let baked = bake_tracks(source, start, end, opts);
        let count = baked.len();
        let name = self.name.clone();
        let annotation = self.ensure_annotation();
        annotation.animation_tracks = baked;
        info!(
            "'{name}': baked {count} tracks over {start}..={end} every {} frames",
            opts.frame_step
        );
        Ok(count)
    }

    /// (min, max) frame over every captured keyframe.
    pub fn frame_range(&self) -> Option<(i32, i32)> {
        self.animation_tracks()
            .iter()
            .filter_map(AnimationTrack::frame_range)
            .reduce(|(a, b), (lo, hi)| (a.min(lo), b.max(hi)))
    }

    /// Drop every captured track. Returns how many were removed.
    pub fn clear_animation(&mut self) -> usize {
        match self.annotation.as_mut() {
            Some(annotation) => {
                let removed = annotation.animation_tracks.len();
                annotation.animation_tracks.clear();
                removed
            }
            None => 0,
        }
    }

    pub fn value_at_frame(&self, property_path: &str, frame: f32) -> Option<(Value, Interpolation)> {
        sampling::value_at_frame(self.animation_tracks(), property_path, frame)
    }

    /// Simplify every track; returns the number of removed keyframes.
    pub fn optimize(&mut self, tolerance: f32) -> Result<usize, AnnotationError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(AnnotationError::InvalidArgument {
                reason: format!("tolerance must be a non-negative number, got {tolerance}"),
            });
        }
        let name = self.name.clone();
        let annotation = self
            .annotation
            .as_mut()
            .ok_or(AnnotationError::NotAnnotated { name: name.clone() })?;
        let removed = optimize_tracks(&mut annotation.animation_tracks, tolerance);
        info!("'{name}': optimize removed {removed} keyframes (tolerance {tolerance})");
        Ok(removed)
    }

    pub fn analyze_motion(&self) -> MotionAnalysis {
        analyze_motion(self.animation_tracks())
    }
}
