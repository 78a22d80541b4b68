//! Shared primitives used by every other module.

/// Frame rate, frame size, dimensions and duration helpers.
pub(crate) mod core;
/// Crate error type.
pub(crate) mod error;
