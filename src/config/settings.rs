use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::{
    core::{Fps, FrameSize},
    error::{StitchError, StitchResult},
};

/// How the allocator schedules Prober calls within one pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProbeMode {
    /// Probe lazily, one source at a time, only as far as the budget requires.
    #[default]
    Sequential,
    /// Probe every source of a pool up front on a dedicated rayon pool.
    ///
    /// Results are still consumed in the pool's input order.
    Parallel {
        /// Worker thread override. `None` uses rayon defaults.
        #[serde(default)]
        threads: Option<usize>,
    },
}

/// Tuning for the duration budget allocator and segment normalizer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Frame size every segment is normalized to.
    pub frame: FrameSize,
    /// Output frame rate.
    pub fps: Fps,
    /// Vertical scroll speed for tall images.
    pub scroll_px_per_sec: f64,
    /// Lower bound on a scrolling image's duration.
    pub min_scroll_secs: f64,
    /// Duration of an image that fits the frame.
    pub static_image_secs: f64,
    /// Images with either raw dimension below this are discarded.
    pub min_image_dimension: u32,
    /// Probe scheduling.
    pub probe_mode: ProbeMode,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            frame: FrameSize::default(),
            fps: Fps::default(),
            scroll_px_per_sec: 100.0,
            min_scroll_secs: 3.0,
            static_image_secs: 5.0,
            min_image_dimension: 500,
            probe_mode: ProbeMode::Sequential,
        }
    }
}

impl AllocatorConfig {
    pub fn validate(&self) -> StitchResult<()> {
        self.frame.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !(self.scroll_px_per_sec.is_finite() && self.scroll_px_per_sec > 0.0) {
            return Err(StitchError::validation("scroll_px_per_sec must be > 0"));
        }
        if !(self.min_scroll_secs.is_finite() && self.min_scroll_secs > 0.0) {
            return Err(StitchError::validation("min_scroll_secs must be > 0"));
        }
        if !(self.static_image_secs.is_finite() && self.static_image_secs > 0.0) {
            return Err(StitchError::validation("static_image_secs must be > 0"));
        }
        if let ProbeMode::Parallel { threads: Some(0) } = self.probe_mode {
            return Err(StitchError::validation("probe threads must be > 0"));
        }
        Ok(())
    }
}

/// Tuning for the subtitle timing synthesizer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    /// Unterminated runs longer than this many characters are force-split.
    pub max_fragment_chars: usize,
    /// Floor on a fragment's ideal duration.
    pub min_fragment_secs: f64,
    /// Ceiling on a fragment's ideal duration, as a share of the block.
    pub max_block_share: f64,
    /// Time reserved for each fragment still to come during sequential assignment.
    pub reserve_secs: f64,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_fragment_chars: 50,
            min_fragment_secs: 0.5,
            max_block_share: 1.0 / 3.0,
            reserve_secs: 0.3,
        }
    }
}

impl SubtitleConfig {
    pub fn validate(&self) -> StitchResult<()> {
        if self.max_fragment_chars == 0 {
            return Err(StitchError::validation("max_fragment_chars must be > 0"));
        }
        if !(self.min_fragment_secs.is_finite() && self.min_fragment_secs > 0.0) {
            return Err(StitchError::validation("min_fragment_secs must be > 0"));
        }
        if !(self.max_block_share.is_finite()
            && self.max_block_share > 0.0
            && self.max_block_share <= 1.0)
        {
            return Err(StitchError::validation(
                "max_block_share must be in (0, 1]",
            ));
        }
        if !(self.reserve_secs.is_finite() && self.reserve_secs > 0.0) {
            return Err(StitchError::validation("reserve_secs must be > 0"));
        }
        Ok(())
    }
}

/// Top-level configuration, loadable from JSON. Missing fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    pub allocator: AllocatorConfig,
    pub subtitles: SubtitleConfig,
}

impl StitchConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> StitchResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| StitchError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StitchResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StitchError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> StitchResult<()> {
        self.allocator.validate()?;
        self.subtitles.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
