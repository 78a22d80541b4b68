use std::path::Path;

use crate::{
    foundation::{
        core::{Fps, FrameSize},
        error::{StitchError, StitchResult},
    },
    model::{
        segment::{Segment, SegmentKind, Timeline},
        source::SourceKind,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
/// What the media processor does with one step's source.
pub enum StepOp {
    /// Normalize a clip; cut it to `trim_to` seconds when set.
    Clip {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trim_to: Option<f64>,
    },
    /// Hold a scaled image for the step's duration.
    Still,
    /// Scroll a scaled image top to bottom over the step's duration.
    Scroll { distance: u32 },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One entry in a [`ConcatenationPlan`].
pub struct PlanStep {
    pub index: usize,
    pub location: String,
    pub source_kind: SourceKind,
    pub op: StepOp,
    /// Timeline start in seconds.
    pub start: f64,
    pub duration: f64,
    /// Frames this step occupies after cumulative rounding.
    pub frames: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Ordered concatenation plan handed to the media processor.
///
/// Steps are executed independently and concatenated once, in order.
pub struct ConcatenationPlan {
    pub frame: FrameSize,
    pub fps: Fps,
    pub target_duration: f64,
    pub total_duration: f64,
    pub total_frames: u64,
    pub steps: Vec<PlanStep>,
}

impl ConcatenationPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn to_json_pretty(&self) -> StitchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StitchError::serde(format!("encode plan JSON: {e}")))
    }

    pub fn write_json(&self, path: &Path) -> StitchResult<()> {
        crate::process::processor::ensure_parent_dir(path)?;
        std::fs::write(path, self.to_json_pretty()?).map_err(|e| {
            StitchError::validation(format!("write plan '{}': {e}", path.display()))
        })
    }
}

/// Serialize a timeline into a concatenation plan.
///
/// Output geometry comes from the segments' render parameters (the allocator gives every segment
/// the same frame size and rate); an empty timeline gets the defaults. Frame counts are derived
/// from cumulative boundaries (`round(end * fps) - round(start * fps)`), so rounding never
/// accumulates and the total is within one frame of the timeline's length.
pub fn emit_plan(timeline: &Timeline) -> ConcatenationPlan {
    let (frame, fps) = timeline
        .segments
        .first()
        .map(|s| (s.render.frame, s.render.fps))
        .unwrap_or_default();
    let mut steps = Vec::with_capacity(timeline.len());
    let mut start = 0.0;
    let mut start_frame = 0u64;

    for (index, seg) in timeline.segments.iter().enumerate() {
        let end = start + seg.duration;
        let end_frame = fps.secs_to_frames_round(end);
        let op = match seg.kind {
            SegmentKind::Clip => StepOp::Clip {
                trim_to: seg.is_trimmed().then_some(seg.duration),
            },
            SegmentKind::StaticImage => StepOp::Still,
            SegmentKind::ScrollingImage => StepOp::Scroll {
                distance: scroll_step_distance(seg),
            },
        };
        steps.push(PlanStep {
            index,
            location: seg.source.location.clone(),
            source_kind: seg.source.kind,
            op,
            start,
            duration: seg.duration,
            frames: end_frame.saturating_sub(start_frame),
        });
        start = end;
        start_frame = end_frame;
    }

    ConcatenationPlan {
        frame,
        fps,
        target_duration: timeline.target_duration,
        total_duration: start,
        total_frames: start_frame,
        steps,
    }
}

/// Pixels a scrolling step covers. A clamped segment keeps its natural speed and stops early.
fn scroll_step_distance(seg: &Segment) -> u32 {
    let full = seg.render.scroll_distance.unwrap_or(0);
    if !seg.is_trimmed() {
        return full;
    }
    let share = seg.duration / seg.natural_duration;
    ((f64::from(full) * share).round() as u32).clamp(1, full.max(1))
}

#[cfg(test)]
#[path = "../../tests/unit/emit/plan.rs"]
mod tests;
