use crate::{
    config::settings::SubtitleConfig,
    foundation::{
        core::is_positive_duration,
        error::{StitchError, StitchResult},
    },
    subtitle::split::{fragment_weight, split_text},
};

/// One timed caption unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubtitleFragment {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl SubtitleFragment {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// A narration block to caption: its text, the duration of the audio that speaks it, and where
/// that audio starts on the output timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubtitleRequest {
    pub text: String,
    pub block_duration: f64,
    #[serde(default)]
    pub block_start_offset: f64,
}

impl SubtitleRequest {
    pub fn new(text: impl Into<String>, block_duration: f64, block_start_offset: f64) -> Self {
        Self {
            text: text.into(),
            block_duration,
            block_start_offset,
        }
    }

    /// Back-to-back blocks starting at `start`, each beginning where the previous one ends.
    pub fn sequence<I, S>(start: f64, blocks: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut cursor = start;
        blocks
            .into_iter()
            .map(|(text, secs)| {
                let req = Self::new(text, secs, cursor);
                cursor += secs;
                req
            })
            .collect()
    }
}

/// Split `text` into fragments and time them so they exactly cover
/// `[block_start_offset, block_start_offset + block_duration]`.
///
/// Empty or whitespace-only text yields no fragments.
#[tracing::instrument(skip(text, cfg), fields(chars = text.chars().count()))]
pub fn synthesize(
    text: &str,
    block_duration: f64,
    block_start_offset: f64,
    cfg: &SubtitleConfig,
) -> StitchResult<Vec<SubtitleFragment>> {
    if !is_positive_duration(block_duration) {
        return Err(StitchError::validation(format!(
            "block duration must be finite and > 0, got {block_duration}"
        )));
    }
    if !(block_start_offset.is_finite() && block_start_offset >= 0.0) {
        return Err(StitchError::validation(format!(
            "block start offset must be finite and >= 0, got {block_start_offset}"
        )));
    }
    cfg.validate()?;

    let parts = split_text(text, cfg.max_fragment_chars);
    if parts.is_empty() {
        return Ok(Vec::new());
    }

    let durations = fragment_durations(&parts, block_duration, cfg);
    Ok(assign_times(
        parts,
        &durations,
        block_duration,
        block_start_offset,
        cfg,
    ))
}

/// Caption several narration blocks and concatenate the results in block order.
pub fn synthesize_blocks(
    blocks: &[SubtitleRequest],
    cfg: &SubtitleConfig,
) -> StitchResult<Vec<SubtitleFragment>> {
    let mut out = Vec::new();
    for block in blocks {
        out.extend(synthesize(
            &block.text,
            block.block_duration,
            block.block_start_offset,
            cfg,
        )?);
    }
    Ok(out)
}

/// Weighted, clamped and budget-scaled duration for each fragment.
fn fragment_durations(parts: &[String], block: f64, cfg: &SubtitleConfig) -> Vec<f64> {
    let weights: Vec<usize> = parts.iter().map(|p| fragment_weight(p)).collect();
    let total_weight: usize = weights.iter().sum();
    if total_weight == 0 {
        let even = block / parts.len() as f64;
        return vec![even; parts.len()];
    }

    let per_unit = block / total_weight as f64;
    let ceiling = block * cfg.max_block_share;
    // Short blocks would otherwise have floor > ceiling.
    let floor = cfg.min_fragment_secs.min(ceiling);
    let mut ideal: Vec<f64> = weights
        .iter()
        .map(|&w| (w as f64 * per_unit).clamp(floor, ceiling))
        .collect();

    let ideal_total: f64 = ideal.iter().sum();
    if ideal_total > block {
        let scale = block / ideal_total;
        for d in &mut ideal {
            *d *= scale;
        }
    }
    ideal
}

/// Lay fragments end to end from the block start. The last fragment always closes the block;
/// every earlier one leaves room for those still to come.
fn assign_times(
    parts: Vec<String>,
    durations: &[f64],
    block: f64,
    offset: f64,
    cfg: &SubtitleConfig,
) -> Vec<SubtitleFragment> {
    let end = offset + block;
    let count = parts.len();
    let mut cursor = offset;
    let mut out = Vec::with_capacity(count);

    for (i, (text, &ideal)) in parts.into_iter().zip(durations).enumerate() {
        if i + 1 == count {
            out.push(SubtitleFragment {
                text,
                start_time: cursor,
                end_time: end,
            });
            break;
        }
        let remaining = end - cursor;
        let after = (count - i - 1) as f64;
        let reserve_each = cfg.reserve_secs.min(remaining / (after + 1.0));
        let cap = remaining - reserve_each * after;
        let secs = ideal.min(cap);
        let start_time = cursor;
        cursor += secs;
        out.push(SubtitleFragment {
            text,
            start_time,
            end_time: cursor,
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/timing.rs"]
mod tests;
