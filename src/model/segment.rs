use crate::{
    foundation::{
        core::{Fps, FrameSize, SECS_EPSILON, is_positive_duration},
        error::{StitchError, StitchResult},
    },
    model::source::Source,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Clip,
    StaticImage,
    ScrollingImage,
}

/// How the media processor should render a segment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderParams {
    pub frame: FrameSize,
    pub fps: Fps,
    /// Pixels scrolled from top to bottom (scrolling images only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_distance: Option<u32>,
    /// Image height after scaling to the frame width (images only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaled_height: Option<u32>,
}

/// A normalized, time-bounded unit ready for concatenation.
///
/// `duration` is what the timeline uses; `natural_duration` is what the source would have
/// contributed before the allocator clamped or trimmed it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub source: Source,
    pub kind: SegmentKind,
    pub duration: f64,
    pub natural_duration: f64,
    pub render: RenderParams,
}

impl Segment {
    pub fn new(
        source: Source,
        kind: SegmentKind,
        duration: f64,
        render: RenderParams,
    ) -> StitchResult<Self> {
        if !is_positive_duration(duration) {
            return Err(StitchError::validation(format!(
                "segment for '{}' must have a finite duration > 0, got {duration}",
                source.location
            )));
        }
        Ok(Self {
            source,
            kind,
            duration,
            natural_duration: duration,
            render,
        })
    }

    /// A copy of this segment shortened to `duration`.
    ///
    /// Returns `None` when the result would not be a usable segment. Never lengthens.
    pub fn truncated(&self, duration: f64) -> Option<Self> {
        let duration = duration.min(self.duration);
        if !is_positive_duration(duration) {
            return None;
        }
        Some(Self {
            duration,
            ..self.clone()
        })
    }

    /// Whether the timeline uses less of the source than it naturally provides.
    pub fn is_trimmed(&self) -> bool {
        self.natural_duration - self.duration > SECS_EPSILON
    }
}

/// Ordered sequence of segments targeting a fixed total duration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub target_duration: f64,
    pub segments: Vec<Segment>,
}

impl Timeline {
    pub fn new(target_duration: f64) -> Self {
        Self {
            target_duration,
            segments: Vec::new(),
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check the timeline invariants: positive segment durations and no overshoot beyond one
    /// frame of `fps`.
    pub fn validate(&self, fps: Fps) -> StitchResult<()> {
        for seg in &self.segments {
            if !is_positive_duration(seg.duration) {
                return Err(StitchError::validation(format!(
                    "segment for '{}' has non-positive duration",
                    seg.source.location
                )));
            }
        }
        let total = self.total_duration();
        if total > self.target_duration + fps.frame_duration_secs() {
            return Err(StitchError::validation(format!(
                "timeline overshoots target: {total:.6}s > {:.6}s",
                self.target_duration
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/segment.rs"]
mod tests;
