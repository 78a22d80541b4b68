//! Subtitle timing synthesizer: splits narration text and times it against a known duration.

/// Punctuation-driven text segmentation and fragment weights.
pub mod split;
/// Duration apportioning with exact block closure.
pub mod timing;
