use serde::Deserialize;

use crate::pipeline::request::PresetLevel;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
    /// Optional path for a JSON summary of per-document outcomes,
    /// resolved relative to the job file.
    pub report: Option<String>,
}

/// One document to compress.
///
/// `target_size` switches the job into target-size mode; otherwise
/// `preset` picks a tier, and with neither the merged quality/dpi values
/// apply as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub input: String,
    pub output: String,
    pub preset: Option<PresetLevel>,
    pub quality: Option<u8>,
    pub dpi: Option<u32>,
    pub strip_metadata: Option<bool>,
    pub grayscale: Option<bool>,
    /// Byte budget for target-size mode.
    pub target_size: Option<u64>,
}
