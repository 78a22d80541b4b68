use crate::foundation::error::{StitchError, StitchResult};

/// Absolute tolerance used when comparing second values produced by summation.
pub const SECS_EPSILON: f64 = 1e-9;

/// Rational frame rate (`num / den` frames per second).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator (must be > 0).
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate.
    pub fn new(num: u32, den: u32) -> StitchResult<Self> {
        if den == 0 {
            return Err(StitchError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StitchError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Length of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to the nearest whole frame count (never negative).
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }

    /// `ffmpeg`-style rational string (`30/1`, `30000/1001`).
    pub fn to_ff_ratio(self) -> String {
        format!("{}/{}", self.num, self.den)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output frame size every segment is normalized to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Build a validated frame size.
    pub fn new(width: u32, height: u32) -> StitchResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Reject zero or odd dimensions (the encoder targets yuv420p).
    pub fn validate(&self) -> StitchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StitchError::validation("frame width/height must be > 0"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(StitchError::validation(
                "frame width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }
}

impl Default for FrameSize {
    // Portrait 1080p, the layout short-form publishing targets use.
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

/// Pixel dimensions of an image source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Build a dimensions record.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height after scaling the image so its width equals `target_width`, preserving aspect.
    ///
    /// Returns `None` for a zero-width image.
    pub fn scaled_height_for_width(self, target_width: u32) -> Option<u32> {
        if self.width == 0 {
            return None;
        }
        let scaled = f64::from(self.height) * f64::from(target_width) / f64::from(self.width);
        Some(scaled.round().max(0.0) as u32)
    }
}

/// Returns `true` if `secs` is a usable duration (finite and strictly positive).
pub fn is_positive_duration(secs: f64) -> bool {
    secs.is_finite() && secs > SECS_EPSILON
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
