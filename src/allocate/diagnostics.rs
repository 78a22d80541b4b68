use crate::foundation::core::{Dimensions, SECS_EPSILON};
use crate::model::segment::Timeline;

/// Soft outcome recorded while allocating. None of these stop the allocation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Probing or normalizing the source failed; it was skipped.
    SourceProbeFailed {
        pool: String,
        location: String,
        reason: String,
    },
    /// Image below the minimum usable size; excluded.
    ImageTooSmall {
        pool: String,
        location: String,
        dimensions: Dimensions,
    },
    /// Clamping would have left the segment with no duration; it was dropped.
    ZeroLengthDropped { pool: String, location: String },
}

impl Diagnostic {
    pub fn location(&self) -> &str {
        match self {
            Self::SourceProbeFailed { location, .. }
            | Self::ImageTooSmall { location, .. }
            | Self::ZeroLengthDropped { location, .. } => location,
        }
    }
}

/// Successful allocation result: the timeline plus everything the caller may want to inspect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Allocation {
    pub timeline: Timeline,
    pub target_duration: f64,
    pub actual_duration: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Allocation {
    /// Missing seconds when the pools could not fill the budget.
    pub fn shortfall(&self) -> Option<f64> {
        let gap = self.target_duration - self.actual_duration;
        (gap > SECS_EPSILON).then_some(gap)
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall().is_none()
    }
}
