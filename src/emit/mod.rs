//! Timeline emitter: serializes allocator and synthesizer output for the media processor.

/// Concatenation plans.
pub mod plan;
/// Subtitle tracks and SRT rendering.
pub mod track;
