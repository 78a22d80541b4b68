/// Convenience result type used across the crate.
pub type StitchResult<T> = Result<T, StitchError>;

#[derive(thiserror::Error, Debug)]
/// Top-level error type for allocation, subtitle synthesis and the media adapters.
pub enum StitchError {
    #[error("validation error: {0}")]
    /// Invalid input (request, config, pool contents).
    Validation(String),

    #[error("probe error: {0}")]
    /// A Prober call failed for one source.
    Probe(String),

    #[error("media error: {0}")]
    /// The external media processor failed.
    Media(String),

    #[error("serialization error: {0}")]
    /// JSON encode/decode failure.
    Serde(String),

    #[error("no sources available: no pool yielded a usable segment")]
    /// No pool yielded any usable segment.
    NoSourcesAvailable,

    #[error(transparent)]
    /// Wrapped lower-level error.
    Other(#[from] anyhow::Error),
}

impl StitchError {
    /// Build a [`StitchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StitchError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build a [`StitchError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`StitchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
