// Request and result types for the compression engine.

use serde::Deserialize;

/// Named quality tiers, lowest to highest fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetLevel {
    /// Screen viewing - smallest size, 96 dpi.
    Screen,
    /// eBook reading - medium size, 150 dpi.
    Ebook,
    /// Print quality - larger size, 300 dpi.
    Printer,
}

impl PresetLevel {
    pub fn quality(self) -> u8 {
        match self {
            PresetLevel::Screen => 40,
            PresetLevel::Ebook => 60,
            PresetLevel::Printer => 80,
        }
    }

    pub fn dpi(self) -> u32 {
        match self {
            PresetLevel::Screen => 96,
            PresetLevel::Ebook => 150,
            PresetLevel::Printer => 300,
        }
    }
}

/// How the caller wants quality chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestMode {
    /// Fixed settings from a named tier.
    Preset(PresetLevel),
    /// Caller-supplied quality and resolution.
    Custom,
    /// Search for the highest quality that fits a byte budget.
    TargetSize { target_bytes: u64 },
}

/// A single compression request.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub mode: RequestMode,
    /// JPEG quality (1-100) for the raster strategy.
    pub quality: u8,
    /// Rasterization scale relative to PDF points (dpi / 72).
    pub resolution_factor: f32,
    pub strip_metadata: bool,
    pub grayscale: bool,
}

impl CompressionRequest {
    /// Request with a preset tier's quality and resolution.
    pub fn preset(level: PresetLevel, strip_metadata: bool, grayscale: bool) -> Self {
        Self {
            mode: RequestMode::Preset(level),
            quality: level.quality(),
            resolution_factor: level.dpi() as f32 / 72.0,
            strip_metadata,
            grayscale,
        }
    }

    /// Request with caller-chosen settings.
    pub fn custom(
        quality: u8,
        resolution_factor: f32,
        strip_metadata: bool,
        grayscale: bool,
    ) -> Self {
        Self {
            mode: RequestMode::Custom,
            quality,
            resolution_factor,
            strip_metadata,
            grayscale,
        }
    }

    /// Request that searches for the highest quality fitting `target_bytes`.
    ///
    /// The search always probes in grayscale, whatever `grayscale` would
    /// say in other modes; the quality field is a placeholder overridden
    /// per probe.
    pub fn target_size(target_bytes: u64, resolution_factor: f32, strip_metadata: bool) -> Self {
        Self {
            mode: RequestMode::TargetSize { target_bytes },
            quality: 50,
            resolution_factor,
            strip_metadata,
            grayscale: true,
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(crate::error::SqueezeError::config(format!(
                "quality must be 1-100, got {}",
                self.quality
            )));
        }
        if !self.resolution_factor.is_finite() || self.resolution_factor <= 0.0 {
            return Err(crate::error::SqueezeError::config(format!(
                "resolution factor must be positive, got {}",
                self.resolution_factor
            )));
        }
        if let RequestMode::TargetSize { target_bytes } = self.mode
            && target_bytes == 0
        {
            return Err(crate::error::SqueezeError::config(
                "target size must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Which strategy produced the returned bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Lossless re-serialization.
    Structural,
    /// Rasterize-and-re-embed.
    Raster,
    /// Neither strategy beat the input; original bytes returned unchanged.
    None,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Structural => write!(f, "structural"),
            Strategy::Raster => write!(f, "raster"),
            Strategy::None => write!(f, "none"),
        }
    }
}

/// Outcome of a completed compression.
///
/// Invariant: `compressed_size <= original_size` always holds; when no
/// strategy beats the input, the original bytes come back with
/// `strategy = None`.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub bytes: Vec<u8>,
    pub original_size: u64,
    pub compressed_size: u64,
    pub page_count: u32,
    pub strategy: Strategy,
    /// `Some` only for target-size requests: whether the returned size
    /// fits the requested budget. `Some(false)` is best-effort delivery,
    /// not failure.
    pub target_met: Option<bool>,
}

/// Terminal state of one compression call.
#[derive(Debug, Clone)]
pub enum CompressionOutcome {
    Completed(CompressionResult),
    /// The cancel token tripped before the document finished; no partial
    /// result exists.
    Cancelled,
}

impl CompressionOutcome {
    pub fn as_completed(&self) -> Option<&CompressionResult> {
        match self {
            CompressionOutcome::Completed(result) => Some(result),
            CompressionOutcome::Cancelled => None,
        }
    }
}
