use super::job::Job;
use super::settings::Settings;
use crate::pipeline::request::{CompressionRequest, PresetLevel};

/// Effective per-job configuration after merging with global settings.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub quality: u8,
    pub dpi: u32,
    pub strip_metadata: bool,
    pub grayscale: bool,
    pub preset: Option<PresetLevel>,
    pub target_size: Option<u64>,
}

impl MergedConfig {
    /// Job values win over settings values where present.
    pub fn new(settings: &Settings, job: &Job) -> Self {
        MergedConfig {
            quality: job.quality.unwrap_or(settings.quality),
            dpi: job.dpi.unwrap_or(settings.dpi),
            strip_metadata: job.strip_metadata.unwrap_or(settings.strip_metadata),
            grayscale: job.grayscale.unwrap_or(settings.grayscale),
            preset: job.preset,
            target_size: job.target_size,
        }
    }

    /// Mode precedence: a byte budget beats a preset beats custom values.
    pub fn to_request(&self) -> CompressionRequest {
        if let Some(target_bytes) = self.target_size {
            CompressionRequest::target_size(
                target_bytes,
                self.dpi as f32 / 72.0,
                self.strip_metadata,
            )
        } else if let Some(level) = self.preset {
            CompressionRequest::preset(level, self.strip_metadata, self.grayscale)
        } else {
            CompressionRequest::custom(
                self.quality,
                self.dpi as f32 / 72.0,
                self.strip_metadata,
                self.grayscale,
            )
        }
    }
}
