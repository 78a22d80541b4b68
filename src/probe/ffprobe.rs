use std::{path::Path, time::Duration};

use crate::{
    foundation::{
        core::Dimensions,
        error::{StitchError, StitchResult},
    },
    model::source::Source,
    probe::prober::Prober,
};

/// Prober backed by the system `ffprobe` binary.
///
/// Local image files are measured from their header through the `image` crate, which avoids a
/// process spawn and works without the `media-ffmpeg` feature.
#[derive(Clone, Debug, Default)]
pub struct FfprobeProber {
    /// I/O timeout handed to ffprobe for network sources (`-rw_timeout`).
    pub timeout: Option<Duration>,
}

impl FfprobeProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Prober for FfprobeProber {
    #[tracing::instrument(skip(self, source), fields(location = %source.location))]
    fn probe_duration(&self, source: &Source) -> StitchResult<f64> {
        let parsed = run_ffprobe(&source.location, self.timeout)?;
        parse_duration(&parsed).ok_or_else(|| {
            StitchError::probe(format!("no duration reported for '{}'", source.location))
        })
    }

    #[tracing::instrument(skip(self, source), fields(location = %source.location))]
    fn probe_dimensions(&self, source: &Source) -> StitchResult<Dimensions> {
        if !is_remote(&source.location) {
            let path = Path::new(&source.location);
            match image::image_dimensions(path) {
                Ok((width, height)) => return Ok(Dimensions { width, height }),
                Err(e) => {
                    tracing::debug!(error = %e, "image header probe failed, falling back to ffprobe");
                }
            }
        }
        let parsed = run_ffprobe(&source.location, self.timeout)?;
        parse_dimensions(&parsed).ok_or_else(|| {
            StitchError::probe(format!(
                "no video/image stream with dimensions in '{}'",
                source.location
            ))
        })
    }
}

/// Whether a location should be handed to ffprobe as a URL rather than read from disk.
pub fn is_remote(location: &str) -> bool {
    location.contains("://")
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
pub(crate) fn parse_probe_json(bytes: &[u8]) -> StitchResult<ProbeOut> {
    serde_json::from_slice(bytes)
        .map_err(|e| StitchError::probe(format!("ffprobe json parse failed: {e}")))
}

/// Container duration, falling back to the first video stream's duration.
pub(crate) fn parse_duration(parsed: &ProbeOut) -> Option<f64> {
    let from_format = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok());
    let from_stream = || {
        parsed
            .streams
            .iter()
            .filter(|s| s.codec_type.as_deref() == Some("video"))
            .find_map(|s| s.duration.as_deref().and_then(|d| d.parse::<f64>().ok()))
    };
    from_format
        .filter(|d| d.is_finite() && *d > 0.0)
        .or_else(from_stream)
}

pub(crate) fn parse_dimensions(parsed: &ProbeOut) -> Option<Dimensions> {
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))?;
    Some(Dimensions {
        width: stream.width?,
        height: stream.height?,
    })
}

#[cfg(feature = "media-ffmpeg")]
fn run_ffprobe(location: &str, timeout: Option<Duration>) -> StitchResult<ProbeOut> {
    let mut cmd = std::process::Command::new("ffprobe");
    cmd.args([
        "-v",
        "error",
        "-print_format",
        "json",
        "-show_streams",
        "-show_format",
    ]);
    if let Some(timeout) = timeout
        && is_remote(location)
    {
        cmd.args(["-rw_timeout", &timeout.as_micros().to_string()]);
    }
    let out = cmd
        .arg(location)
        .output()
        .map_err(|e| StitchError::probe(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StitchError::probe(format!(
            "ffprobe failed for '{location}': {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout)
}

#[cfg(not(feature = "media-ffmpeg"))]
fn run_ffprobe(location: &str, _timeout: Option<Duration>) -> StitchResult<ProbeOut> {
    Err(StitchError::probe(format!(
        "probing '{location}' requires the 'media-ffmpeg' feature"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/probe/ffprobe.rs"]
mod tests;
