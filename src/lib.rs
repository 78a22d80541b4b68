//! Stitchline assembles short vertical videos from heterogeneous media.
//!
//! Given a target duration and pools of clips, images and filler clips, the allocator builds an
//! ordered timeline that fills the budget without overshooting it. Narration text is split into
//! caption fragments timed to cover its audio block exactly. Both results are emitted as plain
//! data for an external media processor:
//!
//! - [`allocate()`] / [`compose()`] produce a [`Timeline`]
//! - [`emit_plan`] turns it into a [`ConcatenationPlan`], run by [`execute_plan`]
//! - [`synthesize`] and [`emit_track`] produce an SRT-ready [`SubtitleTrack`]
#![forbid(unsafe_code)]

mod foundation;

pub mod allocate;
pub mod compose;
pub mod config;
pub mod emit;
/// Sources, segments and timelines.
pub mod model;
/// Source-to-segment conversion.
pub mod normalize;
pub mod process;
pub mod probe;
pub mod subtitle;

pub use crate::foundation::core::{Dimensions, Fps, FrameSize};
pub use crate::foundation::error::{StitchError, StitchResult};

pub use crate::allocate::allocator::allocate;
pub use crate::allocate::diagnostics::{Allocation, Diagnostic};
pub use crate::allocate::pool::{Pool, PoolKind};
pub use crate::compose::request::{CompositionRequest, CompositionResponse, SourceEntry, compose};
pub use crate::config::settings::{AllocatorConfig, ProbeMode, StitchConfig, SubtitleConfig};
pub use crate::emit::plan::{ConcatenationPlan, PlanStep, StepOp, emit_plan};
pub use crate::emit::track::{Cue, SubtitleTrack, emit_track, format_srt_timestamp};
pub use crate::model::segment::{RenderParams, Segment, SegmentKind, Timeline};
pub use crate::model::source::{Source, SourceKind};
pub use crate::normalize::segment::{Normalized, normalize_source};
pub use crate::probe::ffprobe::FfprobeProber;
pub use crate::probe::prober::{Prober, resolve_source};
pub use crate::process::ffmpeg::FfmpegProcessor;
pub use crate::process::processor::{
    HandleKind, MediaHandle, MediaProcessor, execute_plan, is_ffmpeg_on_path,
};
pub use crate::subtitle::timing::{
    SubtitleFragment, SubtitleRequest, synthesize, synthesize_blocks,
};
