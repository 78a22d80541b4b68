use crate::foundation::core::Dimensions;

/// What a source is, which decides how it is probed and normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Pre-existing video clip.
    Clip,
    /// Still image, shown static or scrolled depending on its height.
    Image,
    /// Filler ("append") clip used after clips and images run out.
    FillerClip,
}

impl SourceKind {
    /// Time-based sources are probed for duration, images for dimensions.
    pub fn is_time_based(self) -> bool {
        matches!(self, Self::Clip | Self::FillerClip)
    }
}

/// One unit of input media. `location` is an opaque URL or path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Source {
    pub kind: SourceKind,
    pub location: String,
    /// Duration in seconds (clips only). Filled by the Prober unless the caller supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_duration: Option<f64>,
    /// Pixel size (images only). Filled by the Prober unless the caller supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_dimensions: Option<Dimensions>,
}

impl Source {
    pub fn new(kind: SourceKind, location: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            raw_duration: None,
            raw_dimensions: None,
        }
    }

    pub fn clip(location: impl Into<String>) -> Self {
        Self::new(SourceKind::Clip, location)
    }

    pub fn image(location: impl Into<String>) -> Self {
        Self::new(SourceKind::Image, location)
    }

    pub fn filler(location: impl Into<String>) -> Self {
        Self::new(SourceKind::FillerClip, location)
    }

    /// Attach a known duration so the allocator does not probe this source.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.raw_duration = Some(secs);
        self
    }

    /// Attach known dimensions so the allocator does not probe this source.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.raw_dimensions = Some(Dimensions::new(width, height));
        self
    }

    /// Whether the Prober still has to be consulted before normalization.
    pub fn needs_probe(&self) -> bool {
        if self.kind.is_time_based() {
            self.raw_duration.is_none()
        } else {
            self.raw_dimensions.is_none()
        }
    }
}
