use crate::{
    foundation::error::{StitchError, StitchResult},
    model::source::{Source, SourceKind},
};

/// Policy tag of a pool. Declaration order is consumption priority.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Clip,
    Image,
    Filler,
}

impl PoolKind {
    /// The only source kind a pool of this policy may hold.
    pub fn source_kind(self) -> SourceKind {
        match self {
            Self::Clip => SourceKind::Clip,
            Self::Image => SourceKind::Image,
            Self::Filler => SourceKind::FillerClip,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Image => "image",
            Self::Filler => "filler",
        }
    }
}

/// Named, ordered list of candidate sources sharing one policy.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pool {
    pub name: String,
    pub kind: PoolKind,
    pub sources: Vec<Source>,
}

impl Pool {
    pub fn new(name: impl Into<String>, kind: PoolKind, sources: Vec<Source>) -> Self {
        Self {
            name: name.into(),
            kind,
            sources,
        }
    }

    /// Pool of `kind` built from bare locations, named after the policy.
    pub fn from_locations<I, S>(kind: PoolKind, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source_kind = kind.source_kind();
        let sources = locations
            .into_iter()
            .map(|l| Source::new(source_kind, l))
            .collect();
        Self::new(kind.as_str(), kind, sources)
    }

    pub fn clips<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_locations(PoolKind::Clip, locations)
    }

    pub fn images<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_locations(PoolKind::Image, locations)
    }

    pub fn fillers<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_locations(PoolKind::Filler, locations)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Every source must match the pool's policy tag.
    pub fn validate(&self) -> StitchResult<()> {
        let expected = self.kind.source_kind();
        for src in &self.sources {
            if src.kind != expected {
                return Err(StitchError::validation(format!(
                    "pool '{}' ({}) holds source '{}' of kind {:?}",
                    self.name,
                    self.kind.as_str(),
                    src.location,
                    src.kind
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/allocate/pool.rs"]
mod tests;
