//! Prober seam: measuring source durations and image sizes.

/// `ffprobe`/`image`-backed prober.
pub mod ffprobe;
/// Prober trait and source resolution.
pub mod prober;
