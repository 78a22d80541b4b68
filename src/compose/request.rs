use std::{fs::File, io::BufReader, path::Path};

use crate::{
    allocate::{
        allocator::allocate,
        diagnostics::Diagnostic,
        pool::{Pool, PoolKind},
    },
    config::settings::AllocatorConfig,
    foundation::{
        core::Dimensions,
        error::{StitchError, StitchResult},
    },
    model::{segment::Timeline, source::Source},
    probe::prober::Prober,
};

/// One pool entry: a bare location, or a location with already known media facts.
///
/// ```json
/// ["a.mp4", { "location": "b.mp4", "raw_duration": 4.2 }]
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Location(String),
    Detailed {
        location: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_duration: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_dimensions: Option<Dimensions>,
    },
}

impl SourceEntry {
    fn to_source(&self, kind: PoolKind) -> Source {
        let source_kind = kind.source_kind();
        match self {
            Self::Location(location) => Source::new(source_kind, location.clone()),
            Self::Detailed {
                location,
                raw_duration,
                raw_dimensions,
            } => Source {
                raw_duration: *raw_duration,
                raw_dimensions: *raw_dimensions,
                ..Source::new(source_kind, location.clone())
            },
        }
    }
}

impl From<&str> for SourceEntry {
    fn from(location: &str) -> Self {
        Self::Location(location.to_string())
    }
}

/// Top-level input: a duration budget and the three candidate pools.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionRequest {
    pub target_duration: f64,
    #[serde(default)]
    pub clip_sources: Vec<SourceEntry>,
    #[serde(default)]
    pub image_sources: Vec<SourceEntry>,
    #[serde(default)]
    pub filler_sources: Vec<SourceEntry>,
}

impl CompositionRequest {
    pub fn new(target_duration: f64) -> Self {
        Self {
            target_duration,
            clip_sources: Vec::new(),
            image_sources: Vec::new(),
            filler_sources: Vec::new(),
        }
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> StitchResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StitchError::serde(format!("parse composition request JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> StitchResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StitchError::validation(format!("open request JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// The request's pools in priority order: clips, images, fillers.
    pub fn pools(&self) -> Vec<Pool> {
        [
            (PoolKind::Clip, &self.clip_sources),
            (PoolKind::Image, &self.image_sources),
            (PoolKind::Filler, &self.filler_sources),
        ]
        .into_iter()
        .map(|(kind, entries)| {
            let sources = entries.iter().map(|e| e.to_source(kind)).collect();
            Pool::new(kind.as_str(), kind, sources)
        })
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionResponse {
    pub timeline: Timeline,
    pub actual_duration: f64,
    /// Missing seconds; absent when the budget was filled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<f64>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl CompositionResponse {
    pub fn to_json_pretty(&self) -> StitchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StitchError::serde(format!("encode composition JSON: {e}")))
    }
}

/// Allocate a timeline for `req` from its pools.
pub fn compose(
    req: &CompositionRequest,
    prober: &dyn Prober,
    cfg: &AllocatorConfig,
) -> StitchResult<CompositionResponse> {
    let allocation = allocate(req.target_duration, &req.pools(), prober, cfg)?;
    let shortfall = allocation.shortfall();
    Ok(CompositionResponse {
        actual_duration: allocation.actual_duration,
        shortfall,
        diagnostics: allocation.diagnostics,
        timeline: allocation.timeline,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/request.rs"]
mod tests;
