use std::{fmt::Write as _, path::Path};

use crate::{
    foundation::error::{StitchError, StitchResult},
    subtitle::timing::SubtitleFragment,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cue {
    /// 1-based position in the track.
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubtitleTrack {
    pub cues: Vec<Cue>,
}

impl SubtitleTrack {
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Render as SRT: `index\nHH:MM:SS,mmm --> HH:MM:SS,mmm\ntext\n\n` per cue.
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for cue in &self.cues {
            // Writing into a String cannot fail.
            let _ = write!(
                out,
                "{}\n{} --> {}\n{}\n\n",
                cue.index,
                format_srt_timestamp(cue.start),
                format_srt_timestamp(cue.end),
                cue.text
            );
        }
        out
    }

    pub fn write_srt(&self, path: &Path) -> StitchResult<()> {
        crate::process::processor::ensure_parent_dir(path)?;
        std::fs::write(path, self.to_srt()).map_err(|e| {
            StitchError::validation(format!("write subtitles '{}': {e}", path.display()))
        })
    }
}

/// Build a track from timed fragments, numbering cues from 1.
pub fn emit_track(fragments: &[SubtitleFragment]) -> SubtitleTrack {
    SubtitleTrack {
        cues: fragments
            .iter()
            .enumerate()
            .map(|(i, f)| Cue {
                index: i + 1,
                start: f.start_time,
                end: f.end_time,
                text: f.text.clone(),
            })
            .collect(),
    }
}

/// `HH:MM:SS,mmm`, truncating sub-millisecond precision.
pub fn format_srt_timestamp(secs: f64) -> String {
    // Nudge before flooring so values like 1.001 (stored as 1.000999...) keep their last digit.
    let total_ms = (secs.max(0.0) * 1000.0 + 1e-6).floor() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let s = total_secs % 60;
    let m = (total_secs / 60) % 60;
    let h = total_secs / 3600;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

#[cfg(test)]
#[path = "../../tests/unit/emit/track.rs"]
mod tests;
