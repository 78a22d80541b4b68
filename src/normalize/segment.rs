use crate::{
    config::settings::AllocatorConfig,
    foundation::{
        core::Dimensions,
        error::{StitchError, StitchResult},
    },
    model::{
        segment::{RenderParams, Segment, SegmentKind},
        source::{Source, SourceKind},
    },
};

/// Outcome of normalizing one resolved source.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    Segment(Segment),
    /// Image filtered out before allocation; carries its raw size.
    ImageTooSmall(Dimensions),
}

/// Turn a probed source into a candidate segment at the configured frame size and rate.
///
/// `source` must already carry the measurement its kind needs (see
/// [`crate::resolve_source`]).
pub fn normalize_source(source: &Source, cfg: &AllocatorConfig) -> StitchResult<Normalized> {
    let base = RenderParams {
        frame: cfg.frame,
        fps: cfg.fps,
        scroll_distance: None,
        scaled_height: None,
    };

    match source.kind {
        SourceKind::Clip | SourceKind::FillerClip => {
            let secs = source.raw_duration.ok_or_else(|| {
                StitchError::validation(format!("clip '{}' was not probed", source.location))
            })?;
            // Scaling and padding to the frame leave the clip's duration unchanged.
            Segment::new(source.clone(), SegmentKind::Clip, secs, base).map(Normalized::Segment)
        }
        SourceKind::Image => {
            let dims = source.raw_dimensions.ok_or_else(|| {
                StitchError::validation(format!("image '{}' was not probed", source.location))
            })?;
            if dims.width < cfg.min_image_dimension || dims.height < cfg.min_image_dimension {
                return Ok(Normalized::ImageTooSmall(dims));
            }
            let scaled_height = dims.scaled_height_for_width(cfg.frame.width).ok_or_else(|| {
                StitchError::validation(format!("image '{}' has zero width", source.location))
            })?;

            let (kind, secs, scroll_distance) = if scaled_height > cfg.frame.height {
                let distance = scaled_height - cfg.frame.height;
                let secs = scroll_secs(distance, cfg);
                (SegmentKind::ScrollingImage, secs, Some(distance))
            } else {
                (SegmentKind::StaticImage, cfg.static_image_secs, None)
            };

            let render = RenderParams {
                scroll_distance,
                scaled_height: Some(scaled_height),
                ..base
            };
            Segment::new(source.clone(), kind, secs, render).map(Normalized::Segment)
        }
    }
}

/// Time needed to scroll `distance` pixels, never below the configured floor.
pub fn scroll_secs(distance: u32, cfg: &AllocatorConfig) -> f64 {
    (f64::from(distance) / cfg.scroll_px_per_sec).max(cfg.min_scroll_secs)
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/segment.rs"]
mod tests;
