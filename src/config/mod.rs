//! Tuning constants for allocation and subtitle timing, loadable from JSON.

/// Config records and loaders.
pub mod settings;
