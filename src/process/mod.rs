//! Media processor seam: executes a concatenation plan against an external engine.

/// `ffmpeg`-backed processor.
pub mod ffmpeg;
/// Processor trait, media handles and plan execution.
pub mod processor;
