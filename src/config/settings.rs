use std::path::Path;

use serde::Deserialize;

/// Global defaults, overridable per job.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: u8,
    pub dpi: u32,
    pub strip_metadata: bool,
    pub grayscale: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quality: 60,
            dpi: 150,
            strip_metadata: false,
            grayscale: false,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::SqueezeError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
