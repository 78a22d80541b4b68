use std::path::{Path, PathBuf};

use crate::{
    emit::plan::{ConcatenationPlan, StepOp},
    foundation::{
        core::{Fps, FrameSize},
        error::{StitchError, StitchResult},
    },
    model::source::Source,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    Video,
    Image,
}

/// Reference to an intermediate or final artifact owned by a [`MediaProcessor`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaHandle {
    pub path: PathBuf,
    pub kind: HandleKind,
    pub frame: FrameSize,
    pub fps: Fps,
}

/// External engine that turns a plan into media.
///
/// Call order contract used by [`execute_plan`]: every step is normalized first, then optionally
/// trimmed or rendered as a scroll; `concatenate` is called exactly once with all step outputs in
/// plan order.
pub trait MediaProcessor {
    /// Scale/pad a clip to `frame` at `fps`, or scale an image to the frame width.
    fn normalize(&mut self, source: &Source, frame: FrameSize, fps: Fps)
    -> StitchResult<MediaHandle>;
    /// Cut a normalized clip to its first `duration` seconds.
    fn trim(&mut self, handle: &MediaHandle, duration: f64) -> StitchResult<MediaHandle>;
    /// Turn a normalized image into a clip of `duration` seconds, scrolling `scroll_distance`
    /// pixels from top to bottom (`0` holds the image still).
    fn render_scroll(
        &mut self,
        image: &MediaHandle,
        duration: f64,
        scroll_distance: u32,
    ) -> StitchResult<MediaHandle>;
    /// Join clips end to end.
    fn concatenate(&mut self, handles: &[MediaHandle]) -> StitchResult<MediaHandle>;
}

/// Run every step of `plan` through `processor` and concatenate the results once.
#[tracing::instrument(skip(plan, processor), fields(steps = plan.steps.len()))]
pub fn execute_plan(
    plan: &ConcatenationPlan,
    processor: &mut dyn MediaProcessor,
) -> StitchResult<MediaHandle> {
    if plan.is_empty() {
        return Err(StitchError::validation("cannot execute an empty plan"));
    }

    let mut handles = Vec::with_capacity(plan.steps.len());
    for step in &plan.steps {
        let source = Source::new(step.source_kind, step.location.clone());
        let normalized = processor.normalize(&source, plan.frame, plan.fps)?;
        let handle = match step.op {
            StepOp::Clip { trim_to: Some(secs) } => processor.trim(&normalized, secs)?,
            StepOp::Clip { trim_to: None } => normalized,
            StepOp::Still => processor.render_scroll(&normalized, step.duration, 0)?,
            StepOp::Scroll { distance } => {
                processor.render_scroll(&normalized, step.duration, distance)?
            }
        };
        tracing::debug!(index = step.index, path = %handle.path.display(), "step rendered");
        handles.push(handle);
    }

    let out = processor.concatenate(&handles)?;
    tracing::info!(path = %out.path.display(), "plan executed");
    Ok(out)
}

pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> StitchResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/process/processor.rs"]
mod tests;
